use std::{collections::HashSet, sync::Mutex};

use feebook_domain::{BelongsToStudent, Collection, EntityId, Identifiable, Ledger};

use crate::CoreError;

/// Tolerance used when comparing denormalised totals against payment sums.
const TOTAL_EPSILON: f64 = 1e-6;

/// Abstraction over persistence backends capable of storing the ledger collections.
///
/// Collections are read in full and written in full; there is no partial-update protocol.
pub trait LedgerStorage: Send + Sync {
    /// Reads every collection plus the ledger metadata. Missing data reads as empty.
    fn load(&self) -> Result<Ledger, CoreError>;

    /// Persists the listed collections and the ledger metadata as one logical write.
    ///
    /// Implementations must either persist everything or leave previously stored data intact.
    fn commit(&self, ledger: &Ledger, changed: &[Collection]) -> Result<(), CoreError>;
}

/// Process-local storage. Each instance is independent of every other instance.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<Ledger>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            state: Mutex::new(ledger),
        }
    }
}

impl LedgerStorage for MemoryStorage {
    fn load(&self) -> Result<Ledger, CoreError> {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))
    }

    fn commit(&self, ledger: &Ledger, changed: &[Collection]) -> Result<(), CoreError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        for collection in changed {
            match collection {
                Collection::Students => state.students = ledger.students.clone(),
                Collection::Payments => state.payments = ledger.payments.clone(),
                Collection::SkippedMonths => state.skipped_months = ledger.skipped_months.clone(),
            }
        }
        state.meta = ledger.meta.clone();
        Ok(())
    }
}

/// Detects dangling references and drifted totals within a ledger snapshot.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let student_ids: HashSet<_> = ledger.students.iter().map(|s| s.id).collect();
    let mut warnings = Vec::new();

    orphans(&ledger.payments, &student_ids, "payment", &mut warnings);
    orphans(&ledger.skipped_months, &student_ids, "skipped month", &mut warnings);
    let mut seen = HashSet::new();
    for entry in &ledger.skipped_months {
        if !seen.insert((entry.student_id, entry.year, entry.month)) {
            warnings.push(format!(
                "skipped month {} duplicates {} for student {}",
                entry.id,
                entry.month_key().label(),
                entry.student_id
            ));
        }
    }
    for student in &ledger.students {
        let paid = ledger.payments_total(student.id);
        if (student.total_paid - paid).abs() > TOTAL_EPSILON {
            warnings.push(format!(
                "student {} total paid {} differs from payment sum {}",
                student.id, student.total_paid, paid
            ));
        }
    }
    warnings
}

fn orphans<T>(items: &[T], students: &HashSet<EntityId>, kind: &str, warnings: &mut Vec<String>)
where
    T: Identifiable + BelongsToStudent,
{
    for item in items {
        if !students.contains(&item.student_id()) {
            warnings.push(format!(
                "{kind} {} references unknown student {}",
                item.id(),
                item.student_id()
            ));
        }
    }
}
