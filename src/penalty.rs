//! Penalty (cost) evaluation for exam schedules.
//!
//! # Model
//!
//! For every student, the exams that are assigned in the schedule are
//! sorted by day. Each adjacent same-day pair is a conflict and costs
//! [`CONFLICT_PENALTY`]. Every exam then adds a spacing term
//!
//! ```text
//! 2^trials × difficulty² × e^(-a · gap)
//! ```
//!
//! where `gap` is the number of empty days since the student's previous
//! exam. The first exam is measured against a virtual exam on day
//! `-(initial_gap + 1)`, so an exam on day 0 sees exactly `initial_gap`
//! empty days.
//!
//! Enrollments whose subject is unknown to the schedule or unassigned
//! contribute nothing for that student.
//!
//! The evaluator is deterministic: identical inputs give bit-identical
//! totals. All totals are accumulated in one running sum, student by student
//! and exam by exam.

use serde::{Deserialize, Serialize};

use crate::models::{Schedule, Student};

/// Cost of one same-day conflict for one student.
///
/// Any total at or above this value contains at least one conflict.
pub const CONFLICT_PENALTY: f64 = 1_000_000_000.0;

/// Tuning of the spacing term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyParams {
    /// Empty days assumed before a student's first exam.
    pub initial_gap: u32,
    /// Exponential decay rate `a` applied to the gap.
    pub decay: f64,
}

impl Default for PenaltyParams {
    fn default() -> Self {
        Self {
            initial_gap: 3,
            decay: 1.0,
        }
    }
}

impl PenaltyParams {
    /// Sets the virtual gap before the first exam.
    pub fn with_initial_gap(mut self, initial_gap: u32) -> Self {
        self.initial_gap = initial_gap;
        self
    }

    /// Sets the decay rate.
    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    /// Day of the virtual exam preceding every student's first exam.
    #[inline]
    pub fn virtual_last_day(&self) -> i64 {
        -(i64::from(self.initial_gap) + 1)
    }
}

/// Penalty split into its hard and soft parts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PenaltyBreakdown {
    /// Total penalty (identical to [`evaluate`]).
    pub total: f64,
    /// Number of same-day conflicts over all students.
    pub conflicts: usize,
    /// Conflict part of the total.
    pub conflict_penalty: f64,
    /// Spacing part of the total.
    pub spacing_penalty: f64,
}

impl PenaltyBreakdown {
    /// Whether no student has two exams on one day.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts == 0
    }
}

/// One exam of one student, resolved to its day.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScheduledExam {
    pub day: u32,
    pub difficulty: u8,
    pub trials: u32,
}

/// Spacing term for a single exam.
///
/// `gap` below zero is treated as zero.
pub fn exam_term(difficulty: u8, trials: u32, gap: i64, decay: f64) -> f64 {
    let exponent = i32::try_from(trials).unwrap_or(i32::MAX);
    let weight = 2f64.powi(exponent) * f64::from(difficulty).powi(2);
    weight * (-decay * gap.max(0) as f64).exp()
}

/// Scores one student's exams into `acc`.
///
/// Sorts `exams` by day (stable: same-day exams keep enrollment order).
pub(crate) fn accumulate_student(
    exams: &mut [ScheduledExam],
    params: &PenaltyParams,
    acc: &mut PenaltyBreakdown,
) {
    exams.sort_by_key(|e| e.day);

    let conflicts = exams.windows(2).filter(|w| w[0].day == w[1].day).count();
    if conflicts > 0 {
        let cost = conflicts as f64 * CONFLICT_PENALTY;
        acc.total += cost;
        acc.conflict_penalty += cost;
        acc.conflicts += conflicts;
    }

    let mut last_day = params.virtual_last_day();
    for exam in exams.iter() {
        let day = i64::from(exam.day);
        let term = exam_term(exam.difficulty, exam.trials, day - last_day - 1, params.decay);
        acc.total += term;
        acc.spacing_penalty += term;
        last_day = day;
    }
}

fn collect_exams(schedule: &Schedule, student: &Student, out: &mut Vec<ScheduledExam>) {
    out.clear();
    out.extend(student.enrollments().iter().filter_map(|e| {
        schedule.day_of(&e.subject).map(|day| ScheduledExam {
            day,
            difficulty: e.difficulty,
            trials: e.trials,
        })
    }));
}

/// Total penalty of a schedule for a student population.
pub fn evaluate(schedule: &Schedule, students: &[Student], params: &PenaltyParams) -> f64 {
    evaluate_detailed(schedule, students, params).total
}

/// Total penalty with its conflict/spacing split.
pub fn evaluate_detailed(
    schedule: &Schedule,
    students: &[Student],
    params: &PenaltyParams,
) -> PenaltyBreakdown {
    let mut acc = PenaltyBreakdown::default();
    let mut exams = Vec::new();
    for student in students {
        collect_exams(schedule, student, &mut exams);
        accumulate_student(&mut exams, params, &mut acc);
    }
    acc
}

/// Penalty contributed by a single student.
pub fn student_penalty(
    schedule: &Schedule,
    student: &Student,
    params: &PenaltyParams,
) -> PenaltyBreakdown {
    let mut acc = PenaltyBreakdown::default();
    let mut exams = Vec::new();
    collect_exams(schedule, student, &mut exams);
    accumulate_student(&mut exams, params, &mut acc);
    acc
}
