//! Input validation for exam scheduling problems.
//!
//! Checks structural integrity of subjects, students and the calendar
//! before scheduling. Detects:
//! - Duplicate subject names and student ids
//! - Subjects enrolled twice by one student
//! - Difficulty ratings outside 1..=10
//! - An empty horizon or a horizon made only of holidays
//!
//! Enrollments in subjects outside the subject list are not errors: they
//! contribute nothing to the penalty.

use std::collections::HashSet;

use crate::models::{ExamCalendar, Student, Subject};

/// Lowest accepted difficulty rating.
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest accepted difficulty rating.
pub const MAX_DIFFICULTY: u8 = 10;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two subjects share the same name.
    DuplicateSubject,
    /// Two students share the same id.
    DuplicateStudent,
    /// A student lists the same subject twice.
    DuplicateEnrollment,
    /// A difficulty rating is outside 1..=10.
    DifficultyOutOfRange,
    /// The calendar has zero days.
    EmptyHorizon,
    /// Every day of the calendar is a holiday.
    NoAvailableDays,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for an exam scheduling problem.
///
/// Checks:
/// 1. No duplicate subject names
/// 2. No duplicate student ids
/// 3. No subject enrolled twice by one student
/// 4. Every difficulty within 1..=10
/// 5. At least one day in the horizon
/// 6. At least one non-holiday day
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(
    subjects: &[Subject],
    students: &[Student],
    calendar: &ExamCalendar,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut names = HashSet::new();
    for subject in subjects {
        if !names.insert(subject) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateSubject,
                format!("Duplicate subject: {subject}"),
            ));
        }
    }

    let mut student_ids = HashSet::new();
    for student in students {
        if !student_ids.insert(student.id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateStudent,
                format!("Duplicate student ID: {}", student.id),
            ));
        }

        let mut enrolled = HashSet::new();
        for e in student.enrollments() {
            if !enrolled.insert(&e.subject) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateEnrollment,
                    format!("Student {} enrolls in '{}' twice", student.id, e.subject),
                ));
            }
            if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&e.difficulty) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DifficultyOutOfRange,
                    format!(
                        "Student {} rates '{}' at difficulty {} (expected {}-{})",
                        student.id, e.subject, e.difficulty, MIN_DIFFICULTY, MAX_DIFFICULTY
                    ),
                ));
            }
        }
    }

    if calendar.num_days == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyHorizon,
            "Calendar has no days",
        ));
    } else if calendar.available_day_count() == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoAvailableDays,
            format!("All {} days are holidays", calendar.num_days),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
