//! Resolved exam scheduling problem.
//!
//! Bridges domain models (`Subject`, `Student`, `ExamCalendar`) to the
//! solvers. Subjects are resolved to dense indices once, enrollments are
//! compacted per student, and the candidate days are computed up front, so
//! the hot loops (penalty evaluation, neighbor moves) never hash a subject.

use rand::Rng;
use rand::prelude::IndexedRandom;
use std::sync::Arc;

use crate::error::ScheduleError;
use crate::models::{ExamCalendar, Schedule, Student, Subject, SubjectIndex};
use crate::penalty::{self, PenaltyBreakdown, PenaltyParams, ScheduledExam};

/// One enrollment resolved to a dense subject index.
#[derive(Debug, Clone, Copy)]
struct ExamEntry {
    subject: usize,
    difficulty: u8,
    trials: u32,
}

/// A solve-ready exam scheduling instance.
///
/// # Example
/// ```
/// use u_exam_schedule::models::{ExamCalendar, Student, Subject};
/// use u_exam_schedule::ExamProblem;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
///
/// let subjects = vec![Subject::new("Math"), Subject::new("Physics")];
/// let students = vec![Student::new(1).with_subject("Math", 6, 0)];
/// let problem = ExamProblem::new(&subjects, &students, ExamCalendar::new(5)).unwrap();
///
/// let mut rng = SmallRng::seed_from_u64(1);
/// let schedule = problem.random_schedule(&mut rng);
/// assert!(schedule.is_complete());
/// assert!(problem.evaluate(&schedule) >= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ExamProblem {
    subjects: Arc<SubjectIndex>,
    calendar: ExamCalendar,
    candidate_days: Vec<u32>,
    exams: Vec<Vec<ExamEntry>>,
    penalty: PenaltyParams,
}

impl ExamProblem {
    /// Resolves subjects and students against a calendar.
    ///
    /// Enrollments in subjects outside `subjects` are dropped: they can never
    /// be scheduled and contribute no penalty.
    ///
    /// # Errors
    /// [`ScheduleError::NoAvailableDays`] if the calendar has no usable day.
    pub fn new(
        subjects: &[Subject],
        students: &[Student],
        calendar: ExamCalendar,
    ) -> Result<Self, ScheduleError> {
        let candidate_days = calendar.candidate_days()?;
        let subjects = Arc::new(SubjectIndex::new(subjects));

        let exams = students
            .iter()
            .map(|student| {
                student
                    .enrollments()
                    .iter()
                    .filter_map(|e| {
                        subjects.position(&e.subject).map(|idx| ExamEntry {
                            subject: idx,
                            difficulty: e.difficulty,
                            trials: e.trials,
                        })
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            subjects,
            calendar,
            candidate_days,
            exams,
            penalty: PenaltyParams::default(),
        })
    }

    /// Sets the penalty parameters.
    pub fn with_penalty(mut self, penalty: PenaltyParams) -> Self {
        self.penalty = penalty;
        self
    }

    /// Subject universe.
    pub fn subjects(&self) -> &Arc<SubjectIndex> {
        &self.subjects
    }

    /// Number of distinct subjects.
    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    /// Number of students.
    pub fn student_count(&self) -> usize {
        self.exams.len()
    }

    /// Calendar of this problem.
    pub fn calendar(&self) -> &ExamCalendar {
        &self.calendar
    }

    /// Non-holiday days, ascending. Never empty.
    pub fn candidate_days(&self) -> &[u32] {
        &self.candidate_days
    }

    /// Penalty parameters.
    pub fn penalty_params(&self) -> &PenaltyParams {
        &self.penalty
    }

    /// Creates a schedule with every subject unassigned.
    pub fn empty_schedule(&self) -> Schedule {
        Schedule::new(Arc::clone(&self.subjects), self.calendar.num_days)
    }

    /// Draws a uniformly random candidate day.
    pub fn random_day<R: Rng>(&self, rng: &mut R) -> u32 {
        // candidate_days is non-empty by construction
        self.candidate_days.choose(rng).copied().unwrap_or(0)
    }

    /// Creates a random schedule: every subject on a uniformly drawn
    /// candidate day, independently.
    pub fn random_schedule<R: Rng>(&self, rng: &mut R) -> Schedule {
        let mut schedule = self.empty_schedule();
        for idx in 0..self.subjects.len() {
            let day = self.random_day(rng);
            schedule.assign_index(idx, day);
        }
        schedule
    }

    /// Moves one random subject to one random candidate day.
    ///
    /// No-op when there are no subjects.
    pub fn reassign_random<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) {
        if self.subjects.is_empty() {
            return;
        }
        let idx = rng.random_range(0..self.subjects.len());
        let day = self.random_day(rng);
        schedule.assign_index(idx, day);
    }

    /// Penalty of a schedule.
    pub fn evaluate(&self, schedule: &Schedule) -> f64 {
        self.evaluate_detailed(schedule).total
    }

    /// Penalty of a schedule with its conflict/spacing split.
    ///
    /// Agrees with [`penalty::evaluate_detailed`] for the students the
    /// problem was built from.
    /// Schedules built over another subject index are looked up by name.
    pub fn evaluate_detailed(&self, schedule: &Schedule) -> PenaltyBreakdown {
        let same_index = schedule.shares_index(&self.subjects);
        let mut acc = PenaltyBreakdown::default();
        let mut buffer: Vec<ScheduledExam> = Vec::new();

        for entries in &self.exams {
            buffer.clear();
            buffer.extend(entries.iter().filter_map(|e| {
                let day = if same_index {
                    schedule.day_at(e.subject)
                } else {
                    self.subjects
                        .get(e.subject)
                        .and_then(|s| schedule.day_of(s))
                };
                day.map(|day| ScheduledExam {
                    day,
                    difficulty: e.difficulty,
                    trials: e.trials,
                })
            }));
            penalty::accumulate_student(&mut buffer, &self.penalty, &mut acc);
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn subjects(names: &[&str]) -> Vec<Subject> {
        names.iter().copied().map(Subject::new).collect()
    }

    fn sample_students() -> Vec<Student> {
        vec![
            Student::new(0)
                .with_subject("A", 7, 1)
                .with_subject("B", 3, 0)
                .with_subject("C", 5, 2),
            Student::new(1).with_subject("B", 9, 0).with_subject("D", 2, 1),
            Student::new(2).with_subject("A", 4, 0).with_subject("Z", 10, 3),
        ]
    }

    #[test]
    fn test_no_available_days() {
        let cal = ExamCalendar::new(2).with_holidays([0, 1]);
        let err = ExamProblem::new(&subjects(&["A"]), &[], cal).unwrap_err();
        assert_eq!(err, ScheduleError::NoAvailableDays { num_days: 2 });
    }

    #[test]
    fn test_random_schedule_respects_holidays() {
        let cal = ExamCalendar::new(10).with_holidays([0, 2, 4, 6, 8]);
        let problem = ExamProblem::new(&subjects(&["A", "B", "C", "D"]), &[], cal.clone()).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..200 {
            let s = problem.random_schedule(&mut rng);
            assert!(s.is_complete());
            assert!(s.holiday_violations(&cal).is_empty());
            assert!(s.days().iter().flatten().all(|&d| d < 10));
        }
    }

    #[test]
    fn test_dense_and_sparse_evaluation_agree() {
        let subs = subjects(&["A", "B", "C", "D"]);
        let students = sample_students();
        let problem = ExamProblem::new(&subs, &students, ExamCalendar::new(6)).unwrap();
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..50 {
            let s = problem.random_schedule(&mut rng);
            let dense = problem.evaluate(&s);
            let sparse = penalty::evaluate(&s, &students, problem.penalty_params());
            assert_eq!(dense.to_bits(), sparse.to_bits());
        }
    }

    #[test]
    fn test_foreign_schedule_evaluated_by_name() {
        let subs = subjects(&["A", "B", "C", "D"]);
        let students = sample_students();
        let problem = ExamProblem::new(&subs, &students, ExamCalendar::new(6)).unwrap();

        // Same subjects in another order, separate index instance.
        let foreign_index = Arc::new(SubjectIndex::new(&subjects(&["D", "C", "B", "A"])));
        let foreign = Schedule::from_pairs(
            foreign_index,
            6,
            [
                (Subject::new("A"), 0),
                (Subject::new("B"), 2),
                (Subject::new("C"), 4),
                (Subject::new("D"), 5),
            ],
        );
        let expected = penalty::evaluate(&foreign, &students, problem.penalty_params());
        assert_eq!(problem.evaluate(&foreign).to_bits(), expected.to_bits());
    }

    #[test]
    fn test_reassign_random_stays_feasible() {
        let cal = ExamCalendar::new(5).with_holiday(1);
        let problem = ExamProblem::new(&subjects(&["A", "B"]), &[], cal.clone()).unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut s = problem.random_schedule(&mut rng);

        for _ in 0..100 {
            problem.reassign_random(&mut s, &mut rng);
            assert!(s.holiday_violations(&cal).is_empty());
            assert!(s.is_complete());
        }
    }

    #[test]
    fn test_penalty_params_applied() {
        let subs = subjects(&["A"]);
        let students = vec![Student::new(0).with_subject("A", 1, 0)];
        let problem = ExamProblem::new(&subs, &students, ExamCalendar::new(1))
            .unwrap()
            .with_penalty(PenaltyParams::default().with_initial_gap(0));

        let mut s = problem.empty_schedule();
        s.assign_index(0, 0);
        assert!((problem.evaluate(&s) - 1.0).abs() < 1e-12);
    }
}
