//! Services for months excused from fee accrual.

use std::cmp::Reverse;

use feebook_domain::{Collection, EntityId, Ledger, MonthKey, SkippedMonth};

use crate::CoreError;

pub struct SkippedMonthService;

impl SkippedMonthService {
    /// Stores a skipped month. Uniqueness per student and month is the caller's concern; see
    /// [`SkippedMonthService::ensure_not_skipped`].
    pub fn insert(
        ledger: &mut Ledger,
        student_id: EntityId,
        month: u32,
        year: i32,
        reason: impl Into<String>,
    ) -> Result<SkippedMonth, CoreError> {
        if MonthKey::new(year, month).is_none() {
            return Err(CoreError::Validation(format!(
                "month must be between 0 and 11, got {month}"
            )));
        }
        if ledger.student(student_id).is_none() {
            return Err(CoreError::StudentNotFound(student_id));
        }
        let id = ledger.next_id(Collection::SkippedMonths);
        let entry = SkippedMonth::new(id, student_id, month, year, reason.into().trim());
        ledger.skipped_months.push(entry.clone());
        Ok(entry)
    }

    pub fn is_skipped(ledger: &Ledger, student_id: EntityId, month: u32, year: i32) -> bool {
        ledger
            .skipped_months
            .iter()
            .any(|entry| entry.matches(student_id, month, year))
    }

    /// Fails with [`CoreError::Conflict`] when the month is already skipped for the student.
    pub fn ensure_not_skipped(
        ledger: &Ledger,
        student_id: EntityId,
        month: u32,
        year: i32,
    ) -> Result<(), CoreError> {
        if Self::is_skipped(ledger, student_id, month, year) {
            let label = MonthKey { year, month }.label();
            return Err(CoreError::Conflict(format!(
                "{label} is already marked as skipped for student {student_id}"
            )));
        }
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: EntityId) -> Result<SkippedMonth, CoreError> {
        let position = ledger
            .skipped_months
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(CoreError::SkippedMonthNotFound(id))?;
        Ok(ledger.skipped_months.remove(position))
    }

    pub fn list(ledger: &Ledger, student_id: Option<EntityId>) -> Vec<&SkippedMonth> {
        ledger
            .skipped_months
            .iter()
            .filter(|entry| student_id.map_or(true, |id| entry.student_id == id))
            .collect()
    }

    /// The student's skipped months, most recent month first.
    pub fn history(ledger: &Ledger, student_id: EntityId) -> Vec<&SkippedMonth> {
        let mut entries: Vec<&SkippedMonth> = ledger.skipped_for(student_id).collect();
        entries.sort_by_key(|entry| Reverse(entry.month_key()));
        entries
    }
}
