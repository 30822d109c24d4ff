//! Comma-separated exports of students (with balances) and payments.

use std::collections::HashMap;

use chrono::NaiveDate;

use feebook_domain::{EntityId, Ledger, Student};

use crate::{accrual_service::AccrualService, format::plain_amount, payment_service::PaymentService};

pub const STUDENT_HEADERS: [&str; 7] = [
    "ID",
    "Name",
    "Course",
    "Fee Per Month",
    "Total Paid",
    "Join Date",
    "Remaining Balance",
];

pub const PAYMENT_HEADERS: [&str; 7] = [
    "ID",
    "Student ID",
    "Student Name",
    "Amount",
    "Date",
    "Method",
    "Notes",
];

const UNKNOWN_STUDENT: &str = "Unknown";

pub struct ExportService;

impl ExportService {
    /// One row per student, with the remaining balance computed as of `as_of`.
    pub fn students_csv(ledger: &Ledger, as_of: NaiveDate) -> String {
        let mut lines = vec![STUDENT_HEADERS.join(",")];
        for student in &ledger.students {
            let balance =
                AccrualService::remaining_balance(student, ledger.skipped_for(student.id), as_of);
            lines.push(
                [
                    student.id.to_string(),
                    quote(&student.name),
                    quote(&student.course),
                    plain_amount(student.fee_per_month),
                    plain_amount(student.total_paid),
                    student.join_date.to_string(),
                    plain_amount(balance),
                ]
                .join(","),
            );
        }
        lines.join("\n")
    }

    /// One row per payment, optionally restricted to a single student.
    pub fn payments_csv(ledger: &Ledger, student_id: Option<EntityId>) -> String {
        let names: HashMap<EntityId, &str> = ledger
            .students
            .iter()
            .map(|student| (student.id, student.name.as_str()))
            .collect();
        let mut lines = vec![PAYMENT_HEADERS.join(",")];
        for payment in PaymentService::list(ledger, student_id) {
            let name = names
                .get(&payment.student_id)
                .copied()
                .unwrap_or(UNKNOWN_STUDENT);
            lines.push(
                [
                    payment.id.to_string(),
                    payment.student_id.to_string(),
                    quote(name),
                    plain_amount(payment.amount),
                    payment.date.to_string(),
                    payment.method.to_string(),
                    quote(&payment.notes),
                ]
                .join(","),
            );
        }
        lines.join("\n")
    }

    /// Suggested download name, e.g. `payments_John_Doe.csv`.
    pub fn file_name(prefix: &str, student: Option<&Student>) -> String {
        match student {
            Some(student) => {
                let slug = student.name.split_whitespace().collect::<Vec<_>>().join("_");
                format!("{prefix}_{slug}.csv")
            }
            None => format!("{prefix}.csv"),
        }
    }
}

/// Wraps free text in quotes, doubling embedded quotes.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
