//! Domain model for calendar months excused from fee accrual.

use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkippedMonth {
    pub id: EntityId,
    pub student_id: EntityId,
    /// Zero-based month, January is 0.
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub reason: String,
}

impl SkippedMonth {
    pub fn new(
        id: EntityId,
        student_id: EntityId,
        month: u32,
        year: i32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id,
            student_id,
            month,
            year,
            reason: reason.into(),
        }
    }

    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }

    pub fn matches(&self, student_id: EntityId, month: u32, year: i32) -> bool {
        self.student_id == student_id && self.month == month && self.year == year
    }
}

impl Identifiable for SkippedMonth {
    fn id(&self) -> EntityId {
        self.id
    }
}

impl BelongsToStudent for SkippedMonth {
    fn student_id(&self) -> EntityId {
        self.student_id
    }
}
