//! First-run sample records.

use chrono::NaiveDate;

use feebook_domain::{Ledger, PaymentDraft, PaymentMethod, StudentDraft};

use crate::{payment_service::PaymentService, student_service::StudentService, CoreError};

struct SamplePayment {
    student: usize,
    amount: f64,
    date: (i32, u32, u32),
    method: PaymentMethod,
    notes: &'static str,
}

const SAMPLE_STUDENTS: [(&str, &str, f64, (i32, u32, u32)); 3] = [
    ("John Doe", "Computer Science", 1500.0, (2023, 9, 1)),
    ("Jane Smith", "Mathematics", 1200.0, (2023, 8, 15)),
    ("Michael Johnson", "Physics", 1300.0, (2023, 10, 5)),
];

const SAMPLE_PAYMENTS: [SamplePayment; 5] = [
    SamplePayment {
        student: 0,
        amount: 1500.0,
        date: (2023, 9, 5),
        method: PaymentMethod::Cash,
        notes: "First month payment",
    },
    SamplePayment {
        student: 0,
        amount: 1500.0,
        date: (2023, 10, 6),
        method: PaymentMethod::Upi,
        notes: "Second month payment",
    },
    SamplePayment {
        student: 1,
        amount: 1200.0,
        date: (2023, 8, 20),
        method: PaymentMethod::Cash,
        notes: "First month payment",
    },
    SamplePayment {
        student: 1,
        amount: 1200.0,
        date: (2023, 9, 18),
        method: PaymentMethod::Upi,
        notes: "Second month payment",
    },
    SamplePayment {
        student: 2,
        amount: 1300.0,
        date: (2023, 10, 10),
        method: PaymentMethod::Cash,
        notes: "First month payment",
    },
];

pub struct SeedService;

impl SeedService {
    /// Inserts the sample students and payments through the regular services so every
    /// `total_paid` matches its payments.
    pub fn insert_samples(ledger: &mut Ledger) -> Result<usize, CoreError> {
        let mut student_ids = Vec::with_capacity(SAMPLE_STUDENTS.len());
        for (name, course, fee, joined) in SAMPLE_STUDENTS {
            let draft = StudentDraft::new(name, course, fee, ymd(joined)?);
            student_ids.push(StudentService::add(ledger, draft)?.id);
        }
        for sample in &SAMPLE_PAYMENTS {
            let student_id = student_ids[sample.student];
            let draft = PaymentDraft::new(student_id, sample.amount, ymd(sample.date)?, sample.method)
                .with_notes(sample.notes);
            PaymentService::add(ledger, draft)?;
        }
        Ok(student_ids.len())
    }
}

fn ymd((year, month, day): (i32, u32, u32)) -> Result<NaiveDate, CoreError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CoreError::Validation(format!("invalid sample date {year}-{month}-{day}")))
}
