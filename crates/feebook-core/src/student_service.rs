//! Business logic helpers for managing students.

use feebook_domain::{Collection, EntityId, Ledger, Student, StudentDraft};

use crate::CoreError;

/// Records removed together with a student.
#[derive(Debug, Clone)]
pub struct RemovedStudent {
    pub student: Student,
    pub payments_removed: usize,
    pub skipped_months_removed: usize,
}

/// Provides validated CRUD helpers for ledger students.
pub struct StudentService;

impl StudentService {
    /// Adds a new student with `total_paid` set to zero and returns the stored record.
    pub fn add(ledger: &mut Ledger, draft: StudentDraft) -> Result<Student, CoreError> {
        let draft = Self::validate(draft)?;
        let id = ledger.next_id(Collection::Students);
        let student = Student::new(
            id,
            draft.name,
            draft.course,
            draft.fee_per_month,
            draft.join_date,
        );
        ledger.students.push(student.clone());
        Ok(student)
    }

    /// Replaces the editable fields of a student. `total_paid` is left untouched.
    pub fn update(
        ledger: &mut Ledger,
        id: EntityId,
        draft: StudentDraft,
    ) -> Result<Student, CoreError> {
        let draft = Self::validate(draft)?;
        let student = ledger
            .student_mut(id)
            .ok_or(CoreError::StudentNotFound(id))?;
        student.name = draft.name;
        student.course = draft.course;
        student.fee_per_month = draft.fee_per_month;
        student.join_date = draft.join_date;
        Ok(student.clone())
    }

    /// Removes the student and every payment and skipped month that references it.
    pub fn remove(ledger: &mut Ledger, id: EntityId) -> Result<RemovedStudent, CoreError> {
        let position = ledger
            .students
            .iter()
            .position(|student| student.id == id)
            .ok_or(CoreError::StudentNotFound(id))?;
        let student = ledger.students.remove(position);

        let payments_before = ledger.payments.len();
        ledger.payments.retain(|payment| payment.student_id != id);
        let skipped_before = ledger.skipped_months.len();
        ledger.skipped_months.retain(|entry| entry.student_id != id);

        Ok(RemovedStudent {
            student,
            payments_removed: payments_before - ledger.payments.len(),
            skipped_months_removed: skipped_before - ledger.skipped_months.len(),
        })
    }

    pub fn list(ledger: &Ledger) -> Vec<&Student> {
        ledger.students.iter().collect()
    }

    /// Distinct course labels, sorted.
    pub fn courses(ledger: &Ledger) -> Vec<String> {
        let mut courses: Vec<String> = ledger
            .students
            .iter()
            .map(|student| student.course.clone())
            .collect();
        courses.sort();
        courses.dedup();
        courses
    }

    fn validate(draft: StudentDraft) -> Result<StudentDraft, CoreError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("student name is required".into()));
        }
        let course = draft.course.trim();
        if course.is_empty() {
            return Err(CoreError::Validation("course is required".into()));
        }
        if !draft.fee_per_month.is_finite() || draft.fee_per_month <= 0.0 {
            return Err(CoreError::Validation(format!(
                "monthly fee must be a positive amount, got {}",
                draft.fee_per_month
            )));
        }
        Ok(StudentDraft {
            name: name.to_string(),
            course: course.to_string(),
            ..draft
        })
    }
}
