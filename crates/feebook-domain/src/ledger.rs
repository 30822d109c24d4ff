//! Ledger-level container holding every persisted collection.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{common::*, payment::Payment, skipped_month::SkippedMonth, student::Student};

/// Names the independently persisted record collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Collection {
    Students,
    Payments,
    SkippedMonths,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Students,
        Collection::Payments,
        Collection::SkippedMonths,
    ];

    /// Stable storage key for the collection.
    pub fn key(self) -> &'static str {
        match self {
            Collection::Students => "students",
            Collection::Payments => "payments",
            Collection::SkippedMonths => "skipped-months",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Last identifier handed out per collection. Never decreases.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Sequences {
    #[serde(default)]
    pub students: EntityId,
    #[serde(default)]
    pub payments: EntityId,
    #[serde(default)]
    pub skipped_months: EntityId,
}

impl Sequences {
    pub fn get(&self, collection: Collection) -> EntityId {
        match collection {
            Collection::Students => self.students,
            Collection::Payments => self.payments,
            Collection::SkippedMonths => self.skipped_months,
        }
    }

    fn slot_mut(&mut self, collection: Collection) -> &mut EntityId {
        match collection {
            Collection::Students => &mut self.students,
            Collection::Payments => &mut self.payments,
            Collection::SkippedMonths => &mut self.skipped_months,
        }
    }
}

/// Bookkeeping persisted next to the collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerMeta {
    /// Set once first-run sample data handling has happened.
    #[serde(default)]
    pub seeded: bool,
    #[serde(default)]
    pub sequences: Sequences,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub skipped_months: Vec<SkippedMonth>,
    #[serde(default)]
    pub meta: LedgerMeta,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(&self, id: EntityId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn student_mut(&mut self, id: EntityId) -> Option<&mut Student> {
        self.students.iter_mut().find(|student| student.id == id)
    }

    pub fn payment(&self, id: EntityId) -> Option<&Payment> {
        self.payments.iter().find(|payment| payment.id == id)
    }

    pub fn skipped_month(&self, id: EntityId) -> Option<&SkippedMonth> {
        self.skipped_months.iter().find(|entry| entry.id == id)
    }

    pub fn payments_for(&self, student_id: EntityId) -> impl Iterator<Item = &Payment> + '_ {
        self.payments
            .iter()
            .filter(move |payment| payment.student_id == student_id)
    }

    pub fn skipped_for(&self, student_id: EntityId) -> impl Iterator<Item = &SkippedMonth> + '_ {
        self.skipped_months
            .iter()
            .filter(move |entry| entry.student_id == student_id)
    }

    /// Sum of the stored payment amounts for `student_id`.
    pub fn payments_total(&self, student_id: EntityId) -> f64 {
        self.payments_for(student_id).map(|payment| payment.amount).sum()
    }

    pub fn max_id(&self, collection: Collection) -> EntityId {
        match collection {
            Collection::Students => highest_id(&self.students),
            Collection::Payments => highest_id(&self.payments),
            Collection::SkippedMonths => highest_id(&self.skipped_months),
        }
    }

    /// Raises each sequence to at least the highest stored id. Returns the collections whose
    /// sequence had fallen behind.
    pub fn reconcile_sequences(&mut self) -> Vec<Collection> {
        let mut bumped = Vec::new();
        for collection in Collection::ALL {
            let max = self.max_id(collection);
            let slot = self.meta.sequences.slot_mut(collection);
            if *slot < max {
                *slot = max;
                bumped.push(collection);
            }
        }
        bumped
    }

    /// Issues the next identifier for `collection`. Identifiers are never reused.
    pub fn next_id(&mut self, collection: Collection) -> EntityId {
        let max = self.max_id(collection);
        let slot = self.meta.sequences.slot_mut(collection);
        *slot = (*slot).max(max) + 1;
        *slot
    }
}

fn highest_id<T: Identifiable>(items: &[T]) -> EntityId {
    items.iter().map(Identifiable::id).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn join() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn next_id_does_not_reuse_deleted_identifiers() {
        let mut ledger = Ledger::new();
        let first = ledger.next_id(Collection::Students);
        ledger.students.push(Student::new(first, "A", "X", 10.0, join()));
        let second = ledger.next_id(Collection::Students);
        ledger.students.push(Student::new(second, "B", "X", 10.0, join()));
        ledger.students.retain(|s| s.id != second);

        assert_eq!(ledger.next_id(Collection::Students), 3);
    }

    #[test]
    fn reconcile_raises_stale_sequences() {
        let mut ledger = Ledger::new();
        ledger.students.push(Student::new(7, "A", "X", 10.0, join()));

        assert_eq!(ledger.reconcile_sequences(), vec![Collection::Students]);
        assert_eq!(ledger.meta.sequences.get(Collection::Students), 7);
        assert!(ledger.reconcile_sequences().is_empty());
    }

    #[test]
    fn collection_keys_match_persisted_layout() {
        let keys: Vec<_> = Collection::ALL.iter().map(|c| c.key()).collect();
        assert_eq!(keys, ["students", "payments", "skipped-months"]);
    }
}
