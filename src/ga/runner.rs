//! Generational GA runner.
//!
//! # Generation step
//!
//! 1. Score every individual; fitness = `1 / (1 + penalty)`.
//! 2. For each child, draw two parents from a roulette wheel.
//! 3. Segment crossover, then mutation with probability `mutation_rate`.
//! 4. Replace the whole population. With `elitism` the best individual of
//!    the outgoing generation takes slot 0 of the next one.
//!
//! After the last generation the best individual of the final population is
//! returned. Without elitism it can be worse than an individual seen in an
//! earlier generation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::operators::{RouletteWheel, fitness, reassign_mutation, segment_crossover};
use crate::error::ScheduleError;
use crate::models::{ExamCalendar, Schedule, Student, Subject};
use crate::problem::ExamProblem;
use crate::termination::Termination;

/// Genetic algorithm parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generations to run.
    pub generations: usize,
    /// Probability that a child is mutated.
    pub mutation_rate: f64,
    /// Carry the best individual into the next generation unchanged.
    pub elitism: bool,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            elitism: false,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Checks that the parameters can drive a search.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.population_size == 0 {
            return Err(ScheduleError::invalid_parameter(
                "population_size",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ScheduleError::invalid_parameter(
                "mutation_rate",
                format!("must be in [0, 1], got {}", self.mutation_rate),
            ));
        }
        Ok(())
    }
}

/// Outcome of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// Best individual of the final population.
    pub schedule: Schedule,
    /// Penalty of `schedule`.
    pub penalty: f64,
    /// Generations completed.
    pub generations: usize,
    /// Best penalty of each evaluated generation.
    pub history: Vec<f64>,
}

/// Runs the genetic algorithm on a resolved problem.
pub struct GaRunner;

impl GaRunner {
    /// Evolves a randomly seeded population.
    pub fn run<R: Rng>(
        problem: &ExamProblem,
        config: &GaConfig,
        rng: &mut R,
        termination: &Termination,
    ) -> Result<GaResult, ScheduleError> {
        config.validate()?;
        debug!(
            subjects = problem.subject_count(),
            students = problem.student_count(),
            population_size = config.population_size,
            generations = config.generations,
            mutation_rate = config.mutation_rate,
            elitism = config.elitism,
            "starting genetic algorithm"
        );

        let mut population: Vec<Schedule> = (0..config.population_size)
            .map(|_| problem.random_schedule(rng))
            .collect();
        let mut history = Vec::with_capacity(config.generations);
        let mut completed = 0;

        for generation in 0..config.generations {
            if termination.is_reached() {
                warn!(generation, "genetic algorithm stopped early");
                break;
            }

            let penalties: Vec<f64> =
                population.iter().map(|s| problem.evaluate(s)).collect();
            let scores: Vec<f64> = penalties.iter().map(|&p| fitness(p)).collect();
            let best_idx = index_of_min(&penalties);
            history.push(penalties[best_idx]);
            debug!(
                generation,
                best_penalty = penalties[best_idx],
                "generation scored"
            );

            let wheel = RouletteWheel::new(&scores);
            if wheel.is_uniform() {
                warn!(generation, "no usable fitness, selecting parents uniformly");
            }

            let mut next = Vec::with_capacity(config.population_size);
            if config.elitism {
                next.push(population[best_idx].clone());
            }
            while next.len() < config.population_size {
                let parent1 = &population[wheel.select(rng)];
                let parent2 = &population[wheel.select(rng)];
                let mut child = segment_crossover(parent1, parent2, rng);
                reassign_mutation(problem, &mut child, config.mutation_rate, rng);
                next.push(child);
            }

            population = next;
            completed += 1;
        }

        let penalties: Vec<f64> = population.iter().map(|s| problem.evaluate(s)).collect();
        let best_idx = index_of_min(&penalties);
        let penalty = penalties[best_idx];
        let schedule = population.swap_remove(best_idx);

        debug!(
            generations = completed,
            best_penalty = penalty,
            "genetic algorithm finished"
        );

        Ok(GaResult {
            schedule,
            penalty,
            generations: completed,
            history,
        })
    }
}

/// First index of the smallest value. `values` must not be empty.
fn index_of_min(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

/// Schedules subjects with the genetic algorithm.
///
/// # Errors
/// [`ScheduleError::NoAvailableDays`] if every day is a holiday;
/// [`ScheduleError::InvalidParameter`] for an unusable config.
pub fn evolve<R: Rng>(
    subjects: &[Subject],
    students: &[Student],
    calendar: &ExamCalendar,
    config: &GaConfig,
    rng: &mut R,
) -> Result<Schedule, ScheduleError> {
    let problem = ExamProblem::new(subjects, students, calendar.clone())?;
    GaRunner::run(&problem, config, rng, &Termination::never()).map(|r| r.schedule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::penalty::{self, CONFLICT_PENALTY};
    use crate::termination::CancellationToken;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn mixed_problem() -> ExamProblem {
        let subjects: Vec<Subject> = (0..8).map(|i| Subject::new(format!("S{i}"))).collect();
        let students = vec![
            Student::new(0)
                .with_subject("S0", 8, 1)
                .with_subject("S1", 6, 0)
                .with_subject("S2", 4, 0)
                .with_subject("S3", 9, 2),
            Student::new(1)
                .with_subject("S3", 3, 0)
                .with_subject("S4", 7, 1)
                .with_subject("S5", 5, 0),
            Student::new(2)
                .with_subject("S5", 10, 3)
                .with_subject("S6", 2, 0)
                .with_subject("S7", 6, 1),
        ];
        let cal = ExamCalendar::new(12).with_holidays([5, 6]);
        ExamProblem::new(&subjects, &students, cal).unwrap()
    }

    #[test]
    fn test_default_config() {
        let c = GaConfig::default();
        assert_eq!(c.population_size, 50);
        assert_eq!(c.generations, 100);
        assert_eq!(c.mutation_rate, 0.1);
        assert!(!c.elitism);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        assert!(GaConfig::default()
            .with_population_size(0)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_mutation_rate(1.2)
            .validate()
            .is_err());
        assert!(GaConfig::default()
            .with_mutation_rate(-0.1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_run_basic() {
        let problem = mixed_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let config = GaConfig::default().with_population_size(20).with_generations(15);
        let result = GaRunner::run(&problem, &config, &mut rng, &Termination::never()).unwrap();

        assert_eq!(result.generations, 15);
        assert_eq!(result.history.len(), 15);
        assert!(result.schedule.is_complete());
        assert!(result.schedule.holiday_violations(problem.calendar()).is_empty());
        assert_eq!(problem.evaluate(&result.schedule), result.penalty);
    }

    #[test]
    fn test_zero_generations_returns_best_initial() {
        let problem = mixed_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let config = GaConfig::default().with_population_size(10).with_generations(0);
        let result = GaRunner::run(&problem, &config, &mut rng, &Termination::never()).unwrap();

        assert_eq!(result.generations, 0);
        assert!(result.history.is_empty());

        // Same seed, same initial population.
        let mut rng = SmallRng::seed_from_u64(42);
        let best_initial = (0..10)
            .map(|_| problem.evaluate(&problem.random_schedule(&mut rng)))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.penalty, best_initial);
    }

    #[test]
    fn test_elitism_never_loses_best() {
        let problem = mixed_problem();
        for seed in 0..5 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let config = GaConfig::default()
                .with_population_size(12)
                .with_generations(30)
                .with_mutation_rate(0.5)
                .with_elitism(true);
            let result =
                GaRunner::run(&problem, &config, &mut rng, &Termination::never()).unwrap();

            assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
            assert!(result.penalty <= *result.history.last().unwrap());
        }
    }

    #[test]
    fn test_single_individual_population() {
        let problem = mixed_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let config = GaConfig::default().with_population_size(1).with_generations(5);
        let result = GaRunner::run(&problem, &config, &mut rng, &Termination::never()).unwrap();
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn test_cancelled_before_first_generation() {
        let problem = mixed_problem();
        let token = CancellationToken::new();
        token.cancel();
        let mut rng = SmallRng::seed_from_u64(42);
        let result = GaRunner::run(
            &problem,
            &GaConfig::default(),
            &mut rng,
            &Termination::never().with_cancellation(token),
        )
        .unwrap();
        assert_eq!(result.generations, 0);
        assert!(result.schedule.is_complete());
    }

    #[test]
    fn test_forced_conflict_single_day() {
        let subjects = vec![Subject::new("A"), Subject::new("B")];
        let students = vec![Student::new(0).with_subject("A", 5, 0).with_subject("B", 5, 0)];
        let mut rng = SmallRng::seed_from_u64(42);
        let cal = ExamCalendar::new(1);
        let schedule =
            evolve(&subjects, &students, &cal, &GaConfig::default(), &mut rng).unwrap();
        let p = penalty::evaluate(&schedule, &students, &Default::default());
        assert!(p >= CONFLICT_PENALTY);
    }

    #[test]
    fn test_separates_two_subjects() {
        let subjects = vec![Subject::new("A"), Subject::new("B")];
        let students = vec![Student::new(0).with_subject("A", 5, 0).with_subject("B", 5, 1)];
        let cal = ExamCalendar::new(2);
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let schedule =
                evolve(&subjects, &students, &cal, &GaConfig::default(), &mut rng).unwrap();
            let p = penalty::evaluate(&schedule, &students, &Default::default());
            assert!(p < CONFLICT_PENALTY, "seed {seed} left a conflict");
        }
    }

    #[test]
    fn test_no_subjects() {
        let mut rng = SmallRng::seed_from_u64(42);
        let cal = ExamCalendar::new(4);
        let schedule = evolve(&[], &[], &cal, &GaConfig::default(), &mut rng).unwrap();
        assert_eq!(schedule.assigned_count(), 0);
    }

    #[test]
    fn test_index_of_min_first_on_ties() {
        assert_eq!(index_of_min(&[3.0, 1.0, 1.0, 2.0]), 1);
        assert_eq!(index_of_min(&[5.0]), 0);
    }
}
