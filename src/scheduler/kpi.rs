//! Schedule quality metrics (KPIs).
//!
//! Computes exam timetable indicators from a schedule and the student
//! population it was built for.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total Penalty | Evaluator total over all students |
//! | Conflicts | Same-day exam pairs, summed over students |
//! | Student Penalty | Per-student share of the total |
//! | Min Gap | Smallest day distance between a student's consecutive exams |
//! | Days Used | Distinct days holding at least one exam |
//! | Unassigned | Subjects with no day |
//! | Holiday Violations | Subjects placed on a holiday |
//!
//! # Reference
//! Carter, Laporte & Lee (1996), "Examination Timetabling", Sec. 2:
//! proximity cost

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{ExamCalendar, Schedule, Student};
use crate::penalty::{self, PenaltyParams};

/// Exam schedule performance indicators.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleKpi {
    /// Total penalty.
    pub total_penalty: f64,
    /// Number of same-day exam pairs.
    pub conflicts: usize,
    /// Penalty per student id.
    pub student_penalties: BTreeMap<u32, f64>,
    /// Largest single-student penalty.
    pub max_student_penalty: f64,
    /// Mean penalty per student.
    pub mean_student_penalty: f64,
    /// Smallest day distance between consecutive exams of one student
    /// (0 = same day). `None` if nobody has two assigned exams.
    pub min_gap: Option<u32>,
    /// Distinct days with at least one exam.
    pub days_used: usize,
    /// Subjects without a day.
    pub unassigned: usize,
    /// Subjects placed on a holiday.
    pub holiday_violations: usize,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and its students.
    ///
    /// # Arguments
    /// * `schedule` - The schedule to assess.
    /// * `students` - The population the penalty is measured for.
    /// * `calendar` - Horizon and holidays the schedule must respect.
    /// * `params` - Penalty model parameters.
    pub fn calculate(
        schedule: &Schedule,
        students: &[Student],
        calendar: &ExamCalendar,
        params: &PenaltyParams,
    ) -> Self {
        let mut total_penalty = 0.0;
        let mut conflicts = 0;
        let mut max_student_penalty: f64 = 0.0;
        let mut student_penalties = BTreeMap::new();
        let mut min_gap: Option<u32> = None;
        let mut days = Vec::new();

        for student in students {
            let breakdown = penalty::student_penalty(schedule, student, params);
            total_penalty += breakdown.total;
            conflicts += breakdown.conflicts;
            max_student_penalty = max_student_penalty.max(breakdown.total);
            *student_penalties.entry(student.id).or_insert(0.0) += breakdown.total;

            days.clear();
            days.extend(
                student
                    .enrollments()
                    .iter()
                    .filter_map(|e| schedule.day_of(&e.subject)),
            );
            days.sort_unstable();
            for w in days.windows(2) {
                let gap = w[1] - w[0];
                min_gap = Some(min_gap.map_or(gap, |m| m.min(gap)));
            }
        }

        let mean_student_penalty = if students.is_empty() {
            0.0
        } else {
            total_penalty / students.len() as f64
        };

        Self {
            total_penalty,
            conflicts,
            student_penalties,
            max_student_penalty,
            mean_student_penalty,
            min_gap,
            days_used: schedule.days_used(),
            unassigned: schedule.days().len() - schedule.assigned_count(),
            holiday_violations: schedule.holiday_violations(calendar).len(),
        }
    }

    /// Whether no student sits two exams on one day.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts == 0
    }

    /// Whether the schedule is conflict-free, fully assigned, off holidays,
    /// keeps every student at or below `max_student_penalty` and spaces
    /// consecutive exams at least `min_gap` days apart.
    pub fn meets_thresholds(&self, max_student_penalty: f64, min_gap: u32) -> bool {
        self.is_conflict_free()
            && self.unassigned == 0
            && self.holiday_violations == 0
            && self.max_student_penalty <= max_student_penalty
            && self.min_gap.is_none_or(|g| g >= min_gap)
    }
}
