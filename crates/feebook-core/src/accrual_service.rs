//! Fee accrual and remaining-balance computation.
//!
//! Everything here is a pure function of the supplied student, skipped months and
//! reference date. Nothing is cached; callers recompute on every query.

use chrono::NaiveDate;

use feebook_domain::{months_between, SkippedMonth, Student};

/// A freshly joined student is billed for at least this many months.
pub const MINIMUM_BILLED_MONTHS: i64 = 1;

/// Breakdown of how a remaining balance was derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualSummary {
    pub months_elapsed: i64,
    pub skipped_count: i64,
    /// `months_elapsed - skipped_count`; may be negative.
    pub billable_months: i64,
    pub total_due: f64,
    pub total_paid: f64,
    pub remaining_balance: f64,
}

pub struct AccrualService;

impl AccrualService {
    /// Calendar-month difference between `join_date` and `as_of`, floored at one month.
    pub fn months_elapsed(join_date: NaiveDate, as_of: NaiveDate) -> i64 {
        months_between(join_date, as_of).max(MINIMUM_BILLED_MONTHS)
    }

    /// Counts the student's skipped months whose first day lies in `[join_date, as_of]`.
    ///
    /// Entries belonging to other students are ignored.
    pub fn skipped_in_window<'a, I>(student: &Student, skipped: I, as_of: NaiveDate) -> i64
    where
        I: IntoIterator<Item = &'a SkippedMonth>,
    {
        skipped
            .into_iter()
            .filter(|entry| entry.student_id == student.id)
            .filter_map(|entry| entry.month_key().first_day())
            .filter(|first_day| *first_day >= student.join_date && *first_day <= as_of)
            .count() as i64
    }

    pub fn summarize<'a, I>(student: &Student, skipped: I, as_of: NaiveDate) -> AccrualSummary
    where
        I: IntoIterator<Item = &'a SkippedMonth>,
    {
        let months_elapsed = Self::months_elapsed(student.join_date, as_of);
        let skipped_count = Self::skipped_in_window(student, skipped, as_of);
        let billable_months = months_elapsed - skipped_count;
        let total_due = billable_months as f64 * student.fee_per_month;
        let outstanding = total_due - student.total_paid;
        AccrualSummary {
            months_elapsed,
            skipped_count,
            billable_months,
            total_due,
            total_paid: student.total_paid,
            remaining_balance: if outstanding > 0.0 { outstanding } else { 0.0 },
        }
    }

    /// Amount still owed by `student` as of `as_of`, never negative.
    pub fn remaining_balance<'a, I>(student: &Student, skipped: I, as_of: NaiveDate) -> f64
    where
        I: IntoIterator<Item = &'a SkippedMonth>,
    {
        Self::summarize(student, skipped, as_of).remaining_balance
    }
}
