//! Search, filter and sort helpers for the student list view.

use std::{cmp::Ordering, fmt, str::FromStr};

use feebook_domain::{Ledger, Student};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Course,
    FeePerMonth,
    TotalPaid,
    JoinDate,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortField::Name => "name",
            SortField::Course => "course",
            SortField::FeePerMonth => "fee",
            SortField::TotalPaid => "paid",
            SortField::JoinDate => "joined",
        };
        f.write_str(label)
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortField::Name),
            "course" => Ok(SortField::Course),
            "fee" | "feepermonth" => Ok(SortField::FeePerMonth),
            "paid" | "totalpaid" => Ok(SortField::TotalPaid),
            "joined" | "joindate" => Ok(SortField::JoinDate),
            other => Err(CoreError::Validation(format!(
                "unknown sort field `{other}` (expected name, course, fee, paid or joined)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// List-view query over students.
#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
    /// Case-insensitive substring matched against name or course.
    pub search: Option<String>,
    /// Exact course label.
    pub course: Option<String>,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl StudentQuery {
    pub fn matches(&self, student: &Student) -> bool {
        if let Some(course) = self.course.as_deref() {
            if student.course != course {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                student.name.to_lowercase().contains(&needle)
                    || student.course.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }

    fn compare(&self, a: &Student, b: &Student) -> Ordering {
        let ordering = match self.sort {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Course => a.course.cmp(&b.course),
            SortField::FeePerMonth => a.fee_per_month.total_cmp(&b.fee_per_month),
            SortField::TotalPaid => a.total_paid.total_cmp(&b.total_paid),
            SortField::JoinDate => a.join_date.cmp(&b.join_date),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

pub struct QueryService;

impl QueryService {
    pub fn students<'a>(ledger: &'a Ledger, query: &StudentQuery) -> Vec<&'a Student> {
        let mut rows: Vec<&Student> = ledger
            .students
            .iter()
            .filter(|student| query.matches(student))
            .collect();
        rows.sort_by(|a, b| query.compare(a, b));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        let day = |m| NaiveDate::from_ymd_opt(2023, m, 1).unwrap();
        ledger.students.push(Student::new(1, "John Doe", "Computer Science", 1500.0, day(9)));
        ledger.students.push(Student::new(2, "Jane Smith", "Mathematics", 1200.0, day(8)));
        ledger.students.push(Student::new(3, "Michael Johnson", "Physics", 1300.0, day(10)));
        ledger
    }

    fn ids(rows: Vec<&Student>) -> Vec<u64> {
        rows.iter().map(|student| student.id).collect()
    }

    #[test]
    fn search_matches_name_or_course_case_insensitively() {
        let ledger = ledger();
        let query = StudentQuery {
            search: Some("MATH".into()),
            ..StudentQuery::default()
        };
        assert_eq!(ids(QueryService::students(&ledger, &query)), vec![2]);

        let query = StudentQuery {
            search: Some("john".into()),
            ..StudentQuery::default()
        };
        assert_eq!(ids(QueryService::students(&ledger, &query)), vec![1, 3]);
    }

    #[test]
    fn course_filter_and_descending_fee_sort() {
        let ledger = ledger();
        let query = StudentQuery {
            sort: SortField::FeePerMonth,
            direction: SortDirection::Descending,
            ..StudentQuery::default()
        };
        assert_eq!(ids(QueryService::students(&ledger, &query)), vec![1, 3, 2]);

        let query = StudentQuery {
            course: Some("Physics".into()),
            ..StudentQuery::default()
        };
        assert_eq!(ids(QueryService::students(&ledger, &query)), vec![3]);
    }

    #[test]
    fn sort_field_parses_aliases() {
        assert_eq!("joined".parse::<SortField>().unwrap(), SortField::JoinDate);
        assert_eq!("totalPaid".parse::<SortField>().unwrap(), SortField::TotalPaid);
        assert!("age".parse::<SortField>().unwrap_err().is_validation());
    }
}
