//! Shared identity traits and calendar-month helpers.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Integer identifier shared by every persisted entity.
pub type EntityId = u64;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Exposes a stable identifier for entities stored in the ledger.
pub trait Identifiable {
    fn id(&self) -> EntityId;
}

/// Associates entities with the student that owns them.
pub trait BelongsToStudent {
    fn student_id(&self) -> EntityId;
}

/// A calendar month addressed by year and zero-based month (January is 0).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// Returns `None` when `month` is outside `0..=11`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (month < 12).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
        }
    }

    /// First calendar day of the month; `None` when the stored month is out of range.
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.checked_add(1)?, 1)
    }

    /// Linear month index, suitable for subtraction.
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + self.month as i64
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES
            .get(self.month as usize)
            .copied()
            .unwrap_or("Unknown")
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, u64::from(self.month) + 1)
    }
}

/// Number of calendar-month boundaries between `from` and `to`, ignoring the day of month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    MonthKey::from_date(to).index() - MonthKey::from_date(from).index()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_key_rejects_out_of_range_month() {
        assert!(MonthKey::new(2024, 12).is_none());
        assert_eq!(MonthKey::new(2024, 0).unwrap().label(), "January 2024");
    }

    #[test]
    fn months_between_ignores_day_of_month() {
        assert_eq!(months_between(date(2023, 9, 28), date(2023, 10, 2)), 1);
        assert_eq!(months_between(date(2023, 12, 1), date(2024, 1, 31)), 1);
        assert_eq!(months_between(date(2024, 3, 1), date(2024, 1, 1)), -2);
    }

    #[test]
    fn month_keys_order_chronologically() {
        let earlier = MonthKey::new(2023, 11).unwrap();
        let later = MonthKey::new(2024, 0).unwrap();
        assert!(earlier < later);
        assert_eq!(later.first_day(), Some(date(2024, 1, 1)));
        assert_eq!(later.to_string(), "2024-01");
    }

    #[test]
    fn hand_edited_month_out_of_range_has_no_first_day() {
        let corrupt = MonthKey {
            year: 2023,
            month: u32::MAX,
        };
        assert_eq!(corrupt.first_day(), None);
        assert_eq!(corrupt.to_string(), "2023-4294967296");
        assert_eq!(corrupt.label(), "Unknown 2023");
    }
}
