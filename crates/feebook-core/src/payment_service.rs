//! Business logic helpers for recording and reversing payments.

use std::cmp::Reverse;

use feebook_domain::{Collection, EntityId, Ledger, Payment, PaymentDraft};

use crate::CoreError;

/// Keeps `Student::total_paid` in step with the payment collection.
pub struct PaymentService;

impl PaymentService {
    /// Records a payment and credits the owning student's `total_paid`.
    pub fn add(ledger: &mut Ledger, draft: PaymentDraft) -> Result<Payment, CoreError> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(CoreError::Validation(format!(
                "payment amount must be positive, got {}",
                draft.amount
            )));
        }
        if ledger.student(draft.student_id).is_none() {
            return Err(CoreError::StudentNotFound(draft.student_id));
        }

        let id = ledger.next_id(Collection::Payments);
        let payment = Payment::new(
            id,
            draft.student_id,
            draft.amount,
            draft.date,
            draft.method,
            draft.notes,
        );
        ledger.payments.push(payment.clone());
        if let Some(student) = ledger.student_mut(payment.student_id) {
            student.total_paid += payment.amount;
        }
        Ok(payment)
    }

    /// Debits the owning student's `total_paid`, then removes the payment.
    ///
    /// The debit is not clamped; a negative total signals data that was edited outside the
    /// store.
    pub fn remove(ledger: &mut Ledger, id: EntityId) -> Result<Payment, CoreError> {
        let position = ledger
            .payments
            .iter()
            .position(|payment| payment.id == id)
            .ok_or(CoreError::PaymentNotFound(id))?;
        let (student_id, amount) = {
            let payment = &ledger.payments[position];
            (payment.student_id, payment.amount)
        };
        if let Some(student) = ledger.student_mut(student_id) {
            student.total_paid -= amount;
        }
        Ok(ledger.payments.remove(position))
    }

    /// Payments in insertion order, optionally restricted to one student.
    pub fn list(ledger: &Ledger, student_id: Option<EntityId>) -> Vec<&Payment> {
        ledger
            .payments
            .iter()
            .filter(|payment| student_id.map_or(true, |id| payment.student_id == id))
            .collect()
    }

    /// The student's payments, most recent first.
    pub fn history(ledger: &Ledger, student_id: EntityId) -> Vec<&Payment> {
        let mut payments: Vec<&Payment> = ledger.payments_for(student_id).collect();
        payments.sort_by_key(|payment| Reverse((payment.date, payment.id)));
        payments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use feebook_domain::{PaymentMethod, Student};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger_with_student() -> Ledger {
        let mut ledger = Ledger::new();
        let id = ledger.next_id(Collection::Students);
        ledger
            .students
            .push(Student::new(id, "Jane", "Maths", 1200.0, date(2023, 8, 15)));
        ledger
    }

    #[test]
    fn add_credits_student_total() {
        let mut ledger = ledger_with_student();
        PaymentService::add(
            &mut ledger,
            PaymentDraft::new(1, 1200.0, date(2023, 8, 20), PaymentMethod::Cash),
        )
        .unwrap();
        PaymentService::add(
            &mut ledger,
            PaymentDraft::new(1, 600.0, date(2023, 9, 18), PaymentMethod::Upi),
        )
        .unwrap();

        assert_eq!(ledger.student(1).unwrap().total_paid, 1800.0);
        assert_eq!(ledger.payments_total(1), 1800.0);
    }

    #[test]
    fn add_rejects_negative_amount_without_side_effects() {
        let mut ledger = ledger_with_student();
        let err = PaymentService::add(
            &mut ledger,
            PaymentDraft::new(1, -5.0, date(2023, 9, 1), PaymentMethod::Cash),
        )
        .unwrap_err();

        assert!(err.is_validation());
        assert_eq!(ledger.student(1).unwrap().total_paid, 0.0);
        assert!(ledger.payments.is_empty());
    }

    #[test]
    fn add_for_unknown_student_is_rejected() {
        let mut ledger = ledger_with_student();
        let err = PaymentService::add(
            &mut ledger,
            PaymentDraft::new(9, 10.0, date(2023, 9, 1), PaymentMethod::Cash),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::StudentNotFound(9)));
    }

    #[test]
    fn remove_debits_without_clamping() {
        let mut ledger = ledger_with_student();
        let payment = PaymentService::add(
            &mut ledger,
            PaymentDraft::new(1, 100.0, date(2023, 9, 1), PaymentMethod::Cash),
        )
        .unwrap();
        ledger.student_mut(1).unwrap().total_paid = 40.0;

        let removed = PaymentService::remove(&mut ledger, payment.id).unwrap();

        assert_eq!(removed.id, payment.id);
        assert_eq!(ledger.student(1).unwrap().total_paid, -60.0);
        assert!(ledger.payment(payment.id).is_none());
    }

    #[test]
    fn history_is_most_recent_first() {
        let mut ledger = ledger_with_student();
        for (amount, day) in [(1.0, date(2023, 9, 1)), (2.0, date(2023, 11, 1)), (3.0, date(2023, 10, 1))] {
            PaymentService::add(&mut ledger, PaymentDraft::new(1, amount, day, PaymentMethod::Cash))
                .unwrap();
        }
        let amounts: Vec<f64> = PaymentService::history(&ledger, 1)
            .iter()
            .map(|payment| payment.amount)
            .collect();
        assert_eq!(amounts, vec![2.0, 3.0, 1.0]);
    }
}
