//! Schedule (solution) model.
//!
//! A schedule maps every subject of a solve to an exam day. It is backed by
//! a dense array over the solve's [`SubjectIndex`]; `None` marks a subject
//! that has not been assigned yet.
//!
//! Holiday exclusion is not enforced by the type. Solvers only ever draw
//! candidate days; [`Schedule::holiday_violations`] checks schedules built
//! by other means.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ExamCalendar, Subject, SubjectIndex};

/// A subject-to-day assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned subject.
    pub subject: Subject,
    /// Exam day index.
    pub day: u32,
}

/// A complete or partial exam schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    subjects: Arc<SubjectIndex>,
    days: Vec<Option<u32>>,
    num_days: u32,
}

impl Schedule {
    /// Creates a schedule with every subject unassigned.
    pub fn new(subjects: Arc<SubjectIndex>, num_days: u32) -> Self {
        let days = vec![None; subjects.len()];
        Self {
            subjects,
            days,
            num_days,
        }
    }

    /// Creates a schedule from `(subject, day)` pairs.
    ///
    /// Pairs naming unknown subjects or out-of-horizon days are skipped.
    pub fn from_pairs(
        subjects: Arc<SubjectIndex>,
        num_days: u32,
        pairs: impl IntoIterator<Item = (Subject, u32)>,
    ) -> Self {
        let mut schedule = Self::new(subjects, num_days);
        for (subject, day) in pairs {
            schedule.assign(&subject, day);
        }
        schedule
    }

    /// Assigns a subject to a day.
    ///
    /// Returns `false` (and leaves the schedule unchanged) if the subject is
    /// not part of this schedule or the day is outside the horizon.
    pub fn assign(&mut self, subject: &Subject, day: u32) -> bool {
        match self.subjects.position(subject) {
            Some(idx) => self.assign_index(idx, day),
            None => false,
        }
    }

    /// Assigns by dense subject index.
    pub fn assign_index(&mut self, idx: usize, day: u32) -> bool {
        if day >= self.num_days {
            return false;
        }
        match self.days.get_mut(idx) {
            Some(slot) => {
                *slot = Some(day);
                true
            }
            None => false,
        }
    }

    /// Clears a subject's assignment.
    pub fn unassign(&mut self, subject: &Subject) {
        if let Some(idx) = self.subjects.position(subject) {
            self.days[idx] = None;
        }
    }

    /// Day assigned to a subject.
    pub fn day_of(&self, subject: &Subject) -> Option<u32> {
        self.subjects
            .position(subject)
            .and_then(|idx| self.day_at(idx))
    }

    /// Day assigned at a dense subject index.
    #[inline]
    pub fn day_at(&self, idx: usize) -> Option<u32> {
        self.days.get(idx).copied().flatten()
    }

    /// Dense day array (one slot per subject).
    #[inline]
    pub fn days(&self) -> &[Option<u32>] {
        &self.days
    }

    /// Horizon length.
    #[inline]
    pub fn num_days(&self) -> u32 {
        self.num_days
    }

    /// Subject universe of this schedule.
    pub fn subject_index(&self) -> &Arc<SubjectIndex> {
        &self.subjects
    }

    /// Whether two schedules index the same subject universe instance.
    pub(crate) fn shares_index(&self, subjects: &Arc<SubjectIndex>) -> bool {
        Arc::ptr_eq(&self.subjects, subjects)
    }

    /// Iterates assigned `(subject, day)` pairs in subject order.
    pub fn iter(&self) -> impl Iterator<Item = (&Subject, u32)> + '_ {
        self.subjects
            .subjects()
            .iter()
            .zip(&self.days)
            .filter_map(|(subject, day)| day.map(|d| (subject, d)))
    }

    /// Serializable assignments in subject order.
    pub fn to_assignments(&self) -> Vec<Assignment> {
        self.iter()
            .map(|(subject, day)| Assignment {
                subject: subject.clone(),
                day,
            })
            .collect()
    }

    /// Subjects examined on a given day.
    pub fn subjects_on(&self, day: u32) -> Vec<&Subject> {
        self.iter()
            .filter(|&(_, d)| d == day)
            .map(|(s, _)| s)
            .collect()
    }

    /// Number of assigned subjects.
    pub fn assigned_count(&self) -> usize {
        self.days.iter().filter(|d| d.is_some()).count()
    }

    /// Whether every subject has a day.
    pub fn is_complete(&self) -> bool {
        self.days.iter().all(Option::is_some)
    }

    /// Number of distinct days holding at least one exam.
    pub fn days_used(&self) -> usize {
        let mut used: Vec<u32> = self.days.iter().flatten().copied().collect();
        used.sort_unstable();
        used.dedup();
        used.len()
    }

    /// Subjects placed on a blocked day.
    pub fn holiday_violations(&self, calendar: &ExamCalendar) -> Vec<&Subject> {
        self.iter()
            .filter(|&(_, d)| calendar.is_holiday(d))
            .map(|(s, _)| s)
            .collect()
    }
}
