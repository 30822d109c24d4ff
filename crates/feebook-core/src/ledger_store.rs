//! Facade that coordinates the in-memory ledger with its storage backend.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use feebook_domain::{
    Collection, EntityId, Ledger, Payment, PaymentDraft, SkippedMonth, Student, StudentDraft,
};

use crate::{
    accrual_service::{AccrualService, AccrualSummary},
    export_service::ExportService,
    payment_service::PaymentService,
    query_service::{QueryService, StudentQuery},
    seed_service::SeedService,
    skipped_month_service::SkippedMonthService,
    storage::{ledger_warnings, LedgerStorage, MemoryStorage},
    student_service::{RemovedStudent, StudentService},
    CoreError,
};

/// Owns the published ledger snapshot and the backend it is persisted to.
///
/// Every mutation runs against a staged copy. The copy replaces the published snapshot only
/// after the backend accepted it, so a failed write leaves readers on the previous state.
pub struct LedgerStore {
    ledger: Ledger,
    storage: Box<dyn LedgerStorage>,
}

impl LedgerStore {
    /// Loads the ledger from `storage`, repairing id sequences that lag behind stored ids.
    pub fn open(storage: Box<dyn LedgerStorage>) -> Result<Self, CoreError> {
        let mut ledger = storage.load()?;
        let repaired = ledger.reconcile_sequences();
        if !repaired.is_empty() {
            let names: Vec<&str> = repaired.iter().map(|c| c.key()).collect();
            warn!(collections = ?names, "id sequences advanced past stored ids");
        }
        for warning in ledger_warnings(&ledger) {
            warn!(%warning, "ledger integrity");
        }
        debug!(
            students = ledger.students.len(),
            payments = ledger.payments.len(),
            skipped_months = ledger.skipped_months.len(),
            "ledger loaded"
        );
        Ok(Self { ledger, storage })
    }

    /// Empty store backed by process memory.
    pub fn in_memory() -> Self {
        Self {
            ledger: Ledger::new(),
            storage: Box::new(MemoryStorage::new()),
        }
    }

    /// First-run setup. Returns `false` when the ledger was already initialized.
    ///
    /// Sample records are only inserted into an empty ledger.
    pub fn initialize(&mut self, with_samples: bool) -> Result<bool, CoreError> {
        if self.ledger.meta.seeded {
            return Ok(false);
        }
        let populated = !self.ledger.students.is_empty();
        if populated && with_samples {
            warn!("ledger already holds students; sample data skipped");
        }
        let inserted = self.mutate(&Collection::ALL, |ledger| {
            let inserted = if with_samples && !populated {
                SeedService::insert_samples(ledger)?
            } else {
                0
            };
            ledger.meta.seeded = true;
            Ok(inserted)
        })?;
        info!(sample_students = inserted, "ledger initialized");
        Ok(true)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn warnings(&self) -> Vec<String> {
        ledger_warnings(&self.ledger)
    }

    // Students

    pub fn list_students(&self) -> Vec<&Student> {
        StudentService::list(&self.ledger)
    }

    pub fn get_student(&self, id: EntityId) -> Option<&Student> {
        self.ledger.student(id)
    }

    pub fn query_students(&self, query: &StudentQuery) -> Vec<&Student> {
        QueryService::students(&self.ledger, query)
    }

    pub fn courses(&self) -> Vec<String> {
        StudentService::courses(&self.ledger)
    }

    pub fn add_student(&mut self, draft: StudentDraft) -> Result<Student, CoreError> {
        let student = self.mutate(&[Collection::Students], |ledger| {
            StudentService::add(ledger, draft)
        })?;
        info!(student_id = student.id, name = %student.name, "student added");
        Ok(student)
    }

    pub fn update_student(
        &mut self,
        id: EntityId,
        draft: StudentDraft,
    ) -> Result<Student, CoreError> {
        let student = self.mutate(&[Collection::Students], |ledger| {
            StudentService::update(ledger, id, draft)
        })?;
        info!(student_id = id, "student updated");
        Ok(student)
    }

    /// Removes the student together with its payments and skipped months.
    pub fn delete_student(&mut self, id: EntityId) -> Result<RemovedStudent, CoreError> {
        let removed = self.mutate(&Collection::ALL, |ledger| StudentService::remove(ledger, id))?;
        info!(
            student_id = id,
            payments = removed.payments_removed,
            skipped_months = removed.skipped_months_removed,
            "student deleted"
        );
        Ok(removed)
    }

    // Payments

    pub fn list_payments(&self, student_id: Option<EntityId>) -> Vec<&Payment> {
        PaymentService::list(&self.ledger, student_id)
    }

    pub fn payment_history(&self, student_id: EntityId) -> Vec<&Payment> {
        PaymentService::history(&self.ledger, student_id)
    }

    /// Records a payment and raises the student's `total_paid` in the same commit.
    pub fn add_payment(&mut self, draft: PaymentDraft) -> Result<Payment, CoreError> {
        let payment = self.mutate(&[Collection::Payments, Collection::Students], |ledger| {
            PaymentService::add(ledger, draft)
        })?;
        info!(
            payment_id = payment.id,
            student_id = payment.student_id,
            amount = payment.amount,
            "payment recorded"
        );
        Ok(payment)
    }

    pub fn delete_payment(&mut self, id: EntityId) -> Result<Payment, CoreError> {
        let payment = self.mutate(&[Collection::Payments, Collection::Students], |ledger| {
            PaymentService::remove(ledger, id)
        })?;
        info!(payment_id = id, student_id = payment.student_id, "payment deleted");
        Ok(payment)
    }

    // Skipped months

    pub fn list_skipped_months(&self, student_id: Option<EntityId>) -> Vec<&SkippedMonth> {
        SkippedMonthService::list(&self.ledger, student_id)
    }

    pub fn skipped_history(&self, student_id: EntityId) -> Vec<&SkippedMonth> {
        SkippedMonthService::history(&self.ledger, student_id)
    }

    pub fn is_month_skipped(&self, student_id: EntityId, month: u32, year: i32) -> bool {
        SkippedMonthService::is_skipped(&self.ledger, student_id, month, year)
    }

    /// Marks a month (0-based) as excused. Fails with a conflict if it already is.
    pub fn add_skipped_month(
        &mut self,
        student_id: EntityId,
        month: u32,
        year: i32,
        reason: impl Into<String>,
    ) -> Result<SkippedMonth, CoreError> {
        let reason = reason.into();
        let entry = self.mutate(&[Collection::SkippedMonths], |ledger| {
            SkippedMonthService::ensure_not_skipped(ledger, student_id, month, year)?;
            SkippedMonthService::insert(ledger, student_id, month, year, reason)
        })?;
        info!(
            skipped_month_id = entry.id,
            student_id,
            month = %entry.month_key(),
            "month skipped"
        );
        Ok(entry)
    }

    pub fn delete_skipped_month(&mut self, id: EntityId) -> Result<SkippedMonth, CoreError> {
        let entry = self.mutate(&[Collection::SkippedMonths], |ledger| {
            SkippedMonthService::remove(ledger, id)
        })?;
        info!(skipped_month_id = id, student_id = entry.student_id, "skipped month removed");
        Ok(entry)
    }

    // Balances

    pub fn accrual_summary(
        &self,
        student_id: EntityId,
        as_of: NaiveDate,
    ) -> Result<AccrualSummary, CoreError> {
        let student = self
            .ledger
            .student(student_id)
            .ok_or(CoreError::StudentNotFound(student_id))?;
        Ok(AccrualService::summarize(
            student,
            self.ledger.skipped_for(student_id),
            as_of,
        ))
    }

    pub fn remaining_balance(&self, student_id: EntityId, as_of: NaiveDate) -> Result<f64, CoreError> {
        self.accrual_summary(student_id, as_of)
            .map(|summary| summary.remaining_balance)
    }

    // Exports

    pub fn students_csv(&self, as_of: NaiveDate) -> String {
        ExportService::students_csv(&self.ledger, as_of)
    }

    pub fn payments_csv(&self, student_id: Option<EntityId>) -> String {
        ExportService::payments_csv(&self.ledger, student_id)
    }

    fn mutate<T, F>(&mut self, changed: &[Collection], apply: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Ledger) -> Result<T, CoreError>,
    {
        let mut staged = self.ledger.clone();
        let outcome = apply(&mut staged)?;
        if let Err(err) = self.storage.commit(&staged, changed) {
            warn!(error = %err, "commit failed; ledger left unchanged");
            return Err(err);
        }
        self.ledger = staged;
        Ok(outcome)
    }
}
