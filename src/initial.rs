//! Initial solution generator.
//!
//! Produces a uniformly random feasible starting point: every subject on an
//! independently drawn non-holiday day. No attempt is made to avoid
//! conflicts; this is a seed for search, not a solution.

use rand::Rng;

use crate::error::ScheduleError;
use crate::models::{ExamCalendar, Schedule, Subject};
use crate::problem::ExamProblem;

/// Creates a random schedule over the calendar's candidate days.
///
/// Draws exactly like [`ExamProblem::random_schedule`], which is what the
/// solvers start from.
///
/// # Errors
/// [`ScheduleError::NoAvailableDays`] if the holidays cover the whole
/// horizon.
pub fn initial_solution<R: Rng>(
    subjects: &[Subject],
    calendar: &ExamCalendar,
    rng: &mut R,
) -> Result<Schedule, ScheduleError> {
    let problem = ExamProblem::new(subjects, &[], calendar.clone())?;
    Ok(problem.random_schedule(rng))
}
