//! Domain model for enrolled students.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: EntityId,
    pub name: String,
    pub course: String,
    pub fee_per_month: f64,
    /// Sum of every payment recorded against this student.
    #[serde(default)]
    pub total_paid: f64,
    pub join_date: NaiveDate,
}

impl Student {
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        course: impl Into<String>,
        fee_per_month: f64,
        join_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            course: course.into(),
            fee_per_month,
            total_paid: 0.0,
            join_date,
        }
    }

    pub fn join_month(&self) -> MonthKey {
        MonthKey::from_date(self.join_date)
    }
}

impl Identifiable for Student {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Caller-supplied fields used to create or edit a [`Student`].
#[derive(Debug, Clone, PartialEq)]
pub struct StudentDraft {
    pub name: String,
    pub course: String,
    pub fee_per_month: f64,
    pub join_date: NaiveDate,
}

impl StudentDraft {
    pub fn new(
        name: impl Into<String>,
        course: impl Into<String>,
        fee_per_month: f64,
        join_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            course: course.into(),
            fee_per_month,
            join_date,
        }
    }
}
