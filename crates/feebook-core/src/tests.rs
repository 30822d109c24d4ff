use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use chrono::NaiveDate;

use crate::{
    storage::{LedgerStorage, MemoryStorage},
    CoreError, LedgerStore,
};
use feebook_domain::{Collection, Ledger, PaymentDraft, PaymentMethod, Student, StudentDraft};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn john() -> StudentDraft {
    StudentDraft::new("John Doe", "Computer Science", 1500.0, date(2023, 9, 1))
}

fn cash(student_id: u64, amount: f64) -> PaymentDraft {
    PaymentDraft::new(student_id, amount, date(2023, 9, 5), PaymentMethod::Cash)
}

/// Storage that accepts writes until switched off.
#[derive(Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    failing: Arc<AtomicBool>,
}

impl LedgerStorage for FlakyStorage {
    fn load(&self) -> Result<Ledger, CoreError> {
        self.inner.load()
    }

    fn commit(&self, ledger: &Ledger, changed: &[Collection]) -> Result<(), CoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("disk full".into()));
        }
        self.inner.commit(ledger, changed)
    }
}

fn flaky_store() -> (LedgerStore, Arc<AtomicBool>) {
    let storage = FlakyStorage::default();
    let failing = Arc::clone(&storage.failing);
    let store = LedgerStore::open(Box::new(storage)).expect("open store");
    (store, failing)
}

#[test]
fn total_paid_follows_payment_additions_and_deletions() {
    let mut store = LedgerStore::in_memory();
    let student = store.add_student(john()).expect("add student");
    assert_eq!(student.total_paid, 0.0);

    let first = store.add_payment(cash(student.id, 1500.0)).expect("first payment");
    store.add_payment(cash(student.id, 700.0)).expect("second payment");
    assert_eq!(store.get_student(student.id).unwrap().total_paid, 2200.0);

    store.delete_payment(first.id).expect("delete payment");
    assert_eq!(store.get_student(student.id).unwrap().total_paid, 700.0);
    assert!(store.warnings().is_empty());
}

#[test]
fn deleting_a_student_cascades_to_payments_and_skips() {
    let mut store = LedgerStore::in_memory();
    let john = store.add_student(john()).unwrap();
    let jane = store
        .add_student(StudentDraft::new("Jane Smith", "Mathematics", 1200.0, date(2023, 8, 15)))
        .unwrap();
    store.add_payment(cash(john.id, 1500.0)).unwrap();
    store.add_payment(cash(jane.id, 1200.0)).unwrap();
    store.add_skipped_month(john.id, 9, 2023, "Travel").unwrap();

    let removed = store.delete_student(john.id).expect("delete student");
    assert_eq!(removed.payments_removed, 1);
    assert_eq!(removed.skipped_months_removed, 1);

    assert!(store.get_student(john.id).is_none());
    assert!(store.list_payments(Some(john.id)).is_empty());
    assert!(store.list_skipped_months(Some(john.id)).is_empty());
    assert_eq!(store.list_payments(None).len(), 1);
    assert!(store.warnings().is_empty());
}

#[test]
fn failed_commit_leaves_published_state_untouched() {
    let (mut store, failing) = flaky_store();
    let student = store.add_student(john()).unwrap();
    store.add_payment(cash(student.id, 1500.0)).unwrap();
    let before = store.ledger().clone();

    failing.store(true, Ordering::SeqCst);
    let err = store.add_payment(cash(student.id, 300.0)).unwrap_err();
    assert!(matches!(err, CoreError::Storage(_)));
    assert!(store.delete_student(student.id).is_err());

    assert_eq!(store.ledger(), &before);
    assert_eq!(store.get_student(student.id).unwrap().total_paid, 1500.0);
}

#[test]
fn identifiers_are_not_reused_after_deletion() {
    let mut store = LedgerStore::in_memory();
    let first = store.add_student(john()).unwrap();
    let second = store.add_student(john()).unwrap();
    store.delete_student(second.id).unwrap();

    let third = store.add_student(john()).unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(third.id, 3);
}

#[test]
fn open_advances_sequences_past_stored_ids() {
    let mut legacy = Ledger::new();
    legacy
        .students
        .push(Student::new(5, "Legacy", "History", 100.0, date(2022, 1, 1)));
    let mut store = LedgerStore::open(Box::new(MemoryStorage::with_ledger(legacy))).unwrap();

    let added = store.add_student(john()).unwrap();
    assert_eq!(added.id, 6);
}

#[test]
fn initialize_seeds_sample_data_once() {
    let mut store = LedgerStore::in_memory();
    assert!(store.initialize(true).expect("initialize"));
    assert_eq!(store.list_students().len(), 3);
    assert_eq!(store.list_payments(None).len(), 5);

    let jane = store.list_students()[1].id;
    store.delete_student(jane).unwrap();
    assert!(!store.initialize(true).unwrap());
    assert_eq!(store.list_students().len(), 2);
}

#[test]
fn initialize_without_samples_only_marks_the_ledger() {
    let mut store = LedgerStore::in_memory();
    assert!(store.initialize(false).unwrap());
    assert!(store.ledger().meta.seeded);
    assert!(store.list_students().is_empty());
}

#[test]
fn duplicate_skipped_month_is_a_conflict() {
    let mut store = LedgerStore::in_memory();
    let student = store.add_student(john()).unwrap();
    store.add_skipped_month(student.id, 10, 2023, "Exams").unwrap();

    let err = store.add_skipped_month(student.id, 10, 2023, "Again").unwrap_err();
    assert!(err.is_conflict());
    assert!(store.is_month_skipped(student.id, 10, 2023));
    assert!(!store.is_month_skipped(student.id, 11, 2023));

    let err = store.add_skipped_month(student.id, 12, 2023, "").unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn unknown_identifiers_are_reported_as_not_found() {
    let mut store = LedgerStore::in_memory();
    assert!(store.delete_student(9).unwrap_err().is_not_found());
    assert!(store.delete_payment(9).unwrap_err().is_not_found());
    assert!(store.delete_skipped_month(9).unwrap_err().is_not_found());
    assert!(store.add_payment(cash(9, 10.0)).unwrap_err().is_not_found());
    assert!(store
        .remaining_balance(9, date(2024, 1, 1))
        .unwrap_err()
        .is_not_found());
}

#[test]
fn skipping_a_month_reduces_the_balance() {
    let mut store = LedgerStore::in_memory();
    let student = store.add_student(john()).unwrap();
    store.add_payment(cash(student.id, 1500.0)).unwrap();
    assert_eq!(store.remaining_balance(student.id, date(2023, 11, 1)).unwrap(), 1500.0);

    store.add_skipped_month(student.id, 8, 2023, "Holiday").unwrap();
    assert_eq!(store.remaining_balance(student.id, date(2023, 11, 1)).unwrap(), 0.0);
}

#[test]
fn histories_are_most_recent_first() {
    let mut store = LedgerStore::in_memory();
    let student = store.add_student(john()).unwrap();
    for (month, day) in [(9, 5), (11, 2), (10, 6)] {
        store
            .add_payment(PaymentDraft::new(
                student.id,
                100.0,
                date(2023, month, day),
                PaymentMethod::Upi,
            ))
            .unwrap();
    }
    store.add_skipped_month(student.id, 0, 2024, "").unwrap();
    store.add_skipped_month(student.id, 11, 2023, "").unwrap();

    let dates: Vec<_> = store
        .payment_history(student.id)
        .iter()
        .map(|payment| payment.date)
        .collect();
    assert_eq!(dates, vec![date(2023, 11, 2), date(2023, 10, 6), date(2023, 9, 5)]);

    let months: Vec<_> = store
        .skipped_history(student.id)
        .iter()
        .map(|entry| (entry.year, entry.month))
        .collect();
    assert_eq!(months, vec![(2024, 0), (2023, 11)]);
}

#[test]
fn student_export_parses_back_with_csv_reader() {
    let mut store = LedgerStore::in_memory();
    let student = store
        .add_student(StudentDraft::new(
            "Doe, \"JJ\" John",
            "Computer Science",
            1500.0,
            date(2023, 9, 1),
        ))
        .unwrap();
    store.add_payment(cash(student.id, 1500.0)).unwrap();

    let exported = store.students_csv(date(2023, 11, 1));
    let mut reader = csv::Reader::from_reader(exported.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.len(), 7);

    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "Doe, \"JJ\" John");
    assert_eq!(&rows[0][4], "1500");
    assert_eq!(&rows[0][5], "2023-09-01");
    assert_eq!(&rows[0][6], "1500");
}

#[test]
fn payment_export_parses_back_with_csv_reader() {
    let mut store = LedgerStore::in_memory();
    store.initialize(true).unwrap();

    let exported = store.payments_csv(Some(1));
    let mut reader = csv::Reader::from_reader(exported.as_bytes());
    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();

    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "John Doe");
    assert_eq!(&rows[1][5], "UPI");
    assert_eq!(&rows[1][6], "Second month payment");
}
