//! Domain models for payments received from students.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: EntityId,
    pub student_id: EntityId,
    pub amount: f64,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    #[serde(default)]
    pub notes: String,
}

impl Payment {
    pub fn new(
        id: EntityId,
        student_id: EntityId,
        amount: f64,
        date: NaiveDate,
        method: PaymentMethod,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id,
            student_id,
            amount,
            date,
            method,
            notes: notes.into(),
        }
    }
}

impl Identifiable for Payment {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl BelongsToStudent for Payment {
    fn student_id(&self) -> EntityId {
        self.student_id
    }
}

/// Caller-supplied fields used to record a [`Payment`].
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub student_id: EntityId,
    pub amount: f64,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub notes: String,
}

impl PaymentDraft {
    pub fn new(student_id: EntityId, amount: f64, date: NaiveDate, method: PaymentMethod) -> Self {
        Self {
            student_id,
            amount,
            date,
            method,
            notes: String::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Enumerates accepted payment channels.
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Upi => "UPI",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParsePaymentMethodError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "upi" => Ok(PaymentMethod::Upi),
            _ => Err(ParsePaymentMethodError(value.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raised when a payment method label is not recognised.
pub struct ParsePaymentMethodError(pub String);

impl fmt::Display for ParsePaymentMethodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown payment method `{}` (expected Cash or UPI)", self.0)
    }
}

impl std::error::Error for ParsePaymentMethodError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_serializes_with_display_labels() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Upi).unwrap(), "\"UPI\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"Cash\"");
        let parsed: PaymentMethod = serde_json::from_str("\"UPI\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Upi);
    }

    #[test]
    fn payment_method_parses_case_insensitively() {
        assert_eq!("upi".parse::<PaymentMethod>(), Ok(PaymentMethod::Upi));
        assert_eq!(" CASH ".parse::<PaymentMethod>(), Ok(PaymentMethod::Cash));
        assert!("card".parse::<PaymentMethod>().is_err());
    }
}
