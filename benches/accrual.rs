use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use feebook_core::{AccrualService, ExportService, LedgerStore};
use feebook_domain::{Ledger, PaymentDraft, PaymentMethod, StudentDraft};

fn build_sample_ledger(student_count: usize) -> Ledger {
    let mut store = LedgerStore::in_memory();
    let start_date = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();

    for idx in 0..student_count {
        let joined = start_date + Duration::days((idx % 365) as i64);
        let student = store
            .add_student(StudentDraft::new(
                format!("Student {idx}"),
                format!("Course {}", idx % 12),
                1000.0 + (idx % 7) as f64 * 100.0,
                joined,
            ))
            .expect("add student");
        for month in 0..6 {
            let paid_on = joined + Duration::days(30 * month);
            store
                .add_payment(PaymentDraft::new(
                    student.id,
                    student.fee_per_month,
                    paid_on,
                    PaymentMethod::Upi,
                ))
                .expect("add payment");
        }
        if idx % 4 == 0 {
            let month = ((idx / 4) % 12) as u32;
            store
                .add_skipped_month(student.id, month, 2023, "Holiday")
                .expect("skip month");
        }
    }
    store.ledger().clone()
}

fn bench_balances(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(1_000));
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("remaining_balance_1k_students", |b| {
        b.iter(|| {
            let total: f64 = ledger
                .students
                .iter()
                .map(|student| {
                    AccrualService::remaining_balance(student, &ledger.skipped_months, as_of)
                })
                .sum();
            black_box(total);
        })
    });
}

fn bench_exports(c: &mut Criterion) {
    let ledger = build_sample_ledger(black_box(1_000));
    let as_of = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("students_csv_1k", |b| {
        b.iter(|| black_box(ExportService::students_csv(&ledger, as_of)))
    });

    c.bench_function("payments_csv_6k", |b| {
        b.iter_batched(
            || ledger.clone(),
            |ledger| black_box(ExportService::payments_csv(&ledger, None)),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_balances, bench_exports);
criterion_main!(benches);
