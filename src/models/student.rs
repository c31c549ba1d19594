//! Student model.
//!
//! A student carries, per enrolled subject, a subjective difficulty rating
//! and the number of prior attempts. Both values live in a single
//! [`Enrollment`] record, so a subject has a trial count iff it has a
//! difficulty.

use serde::{Deserialize, Serialize};

use super::Subject;

/// One enrolled subject with its difficulty and prior attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Enrolled subject.
    pub subject: Subject,
    /// Subjective exam difficulty (1-10).
    pub difficulty: u8,
    /// Prior attempts at this subject.
    #[serde(default)]
    pub trials: u32,
}

/// A student taking exams.
///
/// Enrollments keep insertion order. That order breaks ties between
/// same-day exams when the penalty is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Student identifier.
    pub id: u32,
    /// Enrolled subjects.
    #[serde(default)]
    enrollments: Vec<Enrollment>,
}

impl Student {
    /// Creates a student with no enrollments.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            enrollments: Vec::new(),
        }
    }

    /// Enrolls the student in a subject.
    ///
    /// Re-enrolling overwrites difficulty and trials in place.
    pub fn add_subject(&mut self, subject: Subject, difficulty: u8, trials: u32) {
        if let Some(existing) = self.enrollments.iter_mut().find(|e| e.subject == subject) {
            existing.difficulty = difficulty;
            existing.trials = trials;
        } else {
            self.enrollments.push(Enrollment {
                subject,
                difficulty,
                trials,
            });
        }
    }

    /// Builder form of [`add_subject`](Self::add_subject).
    pub fn with_subject(
        mut self,
        subject: impl Into<Subject>,
        difficulty: u8,
        trials: u32,
    ) -> Self {
        self.add_subject(subject.into(), difficulty, trials);
        self
    }

    /// All enrollments in insertion order.
    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    /// Difficulty for an enrolled subject.
    pub fn difficulty(&self, subject: &Subject) -> Option<u8> {
        self.enrollment(subject).map(|e| e.difficulty)
    }

    /// Prior attempts for an enrolled subject.
    pub fn trials(&self, subject: &Subject) -> Option<u32> {
        self.enrollment(subject).map(|e| e.trials)
    }

    /// Whether the student takes this subject.
    pub fn is_enrolled(&self, subject: &Subject) -> bool {
        self.enrollment(subject).is_some()
    }

    /// Number of enrolled subjects.
    pub fn subject_count(&self) -> usize {
        self.enrollments.len()
    }

    fn enrollment(&self, subject: &Subject) -> Option<&Enrollment> {
        self.enrollments.iter().find(|e| &e.subject == subject)
    }
}
