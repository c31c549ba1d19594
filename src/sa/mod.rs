//! Simulated annealing for exam scheduling.
//!
//! # Algorithm
//!
//! 1. Start from a random schedule and its penalty.
//! 2. Propose a neighbor: copy the current schedule and move one random
//!    subject to one random candidate day.
//! 3. Accept if it is better, otherwise with probability `e^(-Δ/T)`
//!    (Metropolis criterion).
//! 4. Keep the best schedule ever accepted.
//! 5. Cool `T *= cooling_rate` every iteration; stop after
//!    `max_iterations` or once `T < min_temp`.
//!
//! The returned schedule is the best one seen, never worse than the
//! starting schedule.
//!
//! # Reference
//! Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScheduleError;
use crate::models::{ExamCalendar, Schedule, Student, Subject};
use crate::problem::ExamProblem;
use crate::termination::Termination;

/// Simulated annealing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temp: f64,
    /// Geometric cooling factor applied every iteration.
    pub cooling_rate: f64,
    /// Iteration cap.
    pub max_iterations: usize,
    /// Temperature below which the search stops.
    pub min_temp: f64,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temp: 1000.0,
            cooling_rate: 0.995,
            max_iterations: 10_000,
            min_temp: 0.001,
        }
    }
}

impl AnnealingConfig {
    /// Sets the starting temperature.
    pub fn with_initial_temp(mut self, initial_temp: f64) -> Self {
        self.initial_temp = initial_temp;
        self
    }

    /// Sets the cooling factor.
    pub fn with_cooling_rate(mut self, cooling_rate: f64) -> Self {
        self.cooling_rate = cooling_rate;
        self
    }

    /// Sets the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the stop temperature.
    pub fn with_min_temp(mut self, min_temp: f64) -> Self {
        self.min_temp = min_temp;
        self
    }

    /// Checks that the parameters can drive a search.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !(self.initial_temp > 0.0) {
            return Err(ScheduleError::invalid_parameter(
                "initial_temp",
                format!("must be positive, got {}", self.initial_temp),
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(ScheduleError::invalid_parameter(
                "cooling_rate",
                format!("must be in (0, 1], got {}", self.cooling_rate),
            ));
        }
        if !(self.min_temp >= 0.0) {
            return Err(ScheduleError::invalid_parameter(
                "min_temp",
                format!("must be non-negative, got {}", self.min_temp),
            ));
        }
        Ok(())
    }
}

/// Outcome of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealingResult {
    /// Best schedule found.
    pub schedule: Schedule,
    /// Penalty of `schedule`.
    pub penalty: f64,
    /// Penalty of the random starting schedule.
    pub initial_penalty: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Accepted moves.
    pub accepted: usize,
    /// Temperature when the run ended.
    pub final_temperature: f64,
}

/// Runs simulated annealing on a resolved problem.
pub struct AnnealingRunner;

impl AnnealingRunner {
    /// Anneals from a random starting schedule.
    pub fn run<R: Rng>(
        problem: &ExamProblem,
        config: &AnnealingConfig,
        rng: &mut R,
        termination: &Termination,
    ) -> Result<AnnealingResult, ScheduleError> {
        let initial = problem.random_schedule(rng);
        Self::run_from(problem, config, initial, rng, termination)
    }

    /// Anneals from a given starting schedule.
    pub fn run_from<R: Rng>(
        problem: &ExamProblem,
        config: &AnnealingConfig,
        initial: Schedule,
        rng: &mut R,
        termination: &Termination,
    ) -> Result<AnnealingResult, ScheduleError> {
        config.validate()?;
        debug!(
            subjects = problem.subject_count(),
            students = problem.student_count(),
            initial_temp = config.initial_temp,
            cooling_rate = config.cooling_rate,
            max_iterations = config.max_iterations,
            "starting simulated annealing"
        );

        let initial_penalty = problem.evaluate(&initial);
        let mut current = initial;
        let mut current_cost = initial_penalty;
        let mut best = current.clone();
        let mut best_cost = current_cost;

        let mut temp = config.initial_temp;
        let mut iterations = 0;
        let mut accepted = 0;

        if problem.subject_count() > 0 {
            for _ in 0..config.max_iterations {
                if termination.is_reached() {
                    warn!(iterations, "simulated annealing stopped early");
                    break;
                }
                iterations += 1;

                let mut neighbor = current.clone();
                problem.reassign_random(&mut neighbor, rng);
                let neighbor_cost = problem.evaluate(&neighbor);

                let delta = neighbor_cost - current_cost;
                if delta < 0.0 || rng.random::<f64>() < (-delta / temp).exp() {
                    current = neighbor;
                    current_cost = neighbor_cost;
                    accepted += 1;

                    if current_cost < best_cost {
                        best = current.clone();
                        best_cost = current_cost;
                    }
                }

                temp *= config.cooling_rate;
                if temp < config.min_temp {
                    debug!(iterations, temp, "temperature exhausted");
                    break;
                }
            }
        }

        debug!(
            iterations,
            accepted,
            initial_penalty,
            best_penalty = best_cost,
            "simulated annealing finished"
        );

        Ok(AnnealingResult {
            schedule: best,
            penalty: best_cost,
            initial_penalty,
            iterations,
            accepted,
            final_temperature: temp,
        })
    }
}

/// Schedules subjects with simulated annealing.
///
/// # Errors
/// [`ScheduleError::NoAvailableDays`] if every day is a holiday;
/// [`ScheduleError::InvalidParameter`] for an unusable config.
pub fn anneal<R: Rng>(
    subjects: &[Subject],
    students: &[Student],
    calendar: &ExamCalendar,
    config: &AnnealingConfig,
    rng: &mut R,
) -> Result<Schedule, ScheduleError> {
    let problem = ExamProblem::new(subjects, students, calendar.clone())?;
    AnnealingRunner::run(&problem, config, rng, &Termination::never()).map(|r| r.schedule)
}
