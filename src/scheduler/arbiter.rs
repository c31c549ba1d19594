//! Best-of-two arbitration between simulated annealing and the GA.

use std::fmt;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize, Serializer};
use tracing::{debug, info};

use crate::error::ScheduleError;
use crate::ga::{GaConfig, GaRunner};
use crate::models::{ExamCalendar, Schedule, Student, Subject};
use crate::penalty::PenaltyParams;
use crate::problem::ExamProblem;
use crate::sa::{AnnealingConfig, AnnealingRunner};
use crate::termination::{CancellationToken, Termination};

/// Tuning for a full arbitration run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Simulated annealing parameters.
    pub annealing: AnnealingConfig,
    /// Genetic algorithm parameters.
    pub genetic: GaConfig,
    /// Penalty model parameters.
    pub penalty: PenaltyParams,
    /// Run both solvers concurrently.
    pub parallel: bool,
    /// Master seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Wall-clock limit shared by both solvers, in milliseconds.
    pub time_limit_ms: Option<u64>,
}

impl SchedulerConfig {
    /// Sets the annealing parameters.
    pub fn with_annealing(mut self, annealing: AnnealingConfig) -> Self {
        self.annealing = annealing;
        self
    }

    /// Sets the GA parameters.
    pub fn with_genetic(mut self, genetic: GaConfig) -> Self {
        self.genetic = genetic;
        self
    }

    /// Sets the penalty parameters.
    pub fn with_penalty(mut self, penalty: PenaltyParams) -> Self {
        self.penalty = penalty;
        self
    }

    /// Runs both solvers concurrently.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Fixes the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock limit.
    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = Some(time_limit_ms);
        self
    }
}

/// Which solver produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    SimulatedAnnealing,
    Genetic,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SimulatedAnnealing => f.write_str("Simulated Annealing"),
            Self::Genetic => f.write_str("Genetic Algorithm"),
        }
    }
}

/// The schedule chosen by arbitration.
///
/// Serializes the schedule as a list of `{subject, day}` assignments.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    /// Winning schedule.
    #[serde(serialize_with = "serialize_assignments")]
    pub schedule: Schedule,
    /// Penalty of `schedule`.
    pub penalty: f64,
    /// Solver that produced `schedule`.
    pub algorithm: Algorithm,
    /// Re-scored penalty of the annealing result.
    pub annealing_penalty: f64,
    /// Re-scored penalty of the GA result.
    pub genetic_penalty: f64,
    /// Wall-clock time of the annealing run.
    #[serde(serialize_with = "serialize_secs")]
    pub annealing_time: Duration,
    /// Wall-clock time of the GA run.
    #[serde(serialize_with = "serialize_secs")]
    pub genetic_time: Duration,
}

impl Solution {
    /// Whether no student sits two exams on one day.
    pub fn is_conflict_free(&self) -> bool {
        self.penalty < crate::penalty::CONFLICT_PENALTY
    }
}

fn serialize_assignments<S: Serializer>(
    schedule: &Schedule,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    schedule.to_assignments().serialize(serializer)
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Runs both solvers and keeps the better schedule.
///
/// # Example
/// ```
/// use u_exam_schedule::models::{ExamCalendar, Student, Subject};
/// use u_exam_schedule::scheduler::{ExamScheduler, SchedulerConfig};
///
/// let subjects = vec![Subject::new("Math"), Subject::new("Physics")];
/// let students = vec![
///     Student::new(1).with_subject("Math", 7, 0).with_subject("Physics", 5, 1),
/// ];
/// let scheduler = ExamScheduler::new(SchedulerConfig::default().with_seed(7));
/// let solution = scheduler.solve(&subjects, &students, &ExamCalendar::new(4)).unwrap();
/// assert!(solution.schedule.is_complete());
/// assert!(solution.is_conflict_free());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExamScheduler {
    config: SchedulerConfig,
    cancel: Option<CancellationToken>,
}

impl ExamScheduler {
    /// Creates a scheduler with the given configuration.
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config, cancel: None }
    }

    /// Stops both solvers when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    fn termination(&self) -> Termination {
        let mut termination = Termination::never();
        if let Some(token) = &self.cancel {
            termination = termination.with_cancellation(token.clone());
        }
        if let Some(ms) = self.config.time_limit_ms {
            termination = termination.with_time_limit(Duration::from_millis(ms));
        }
        termination
    }

    /// Schedules `subjects` for `students` within `calendar`.
    ///
    /// # Errors
    /// [`ScheduleError::NoAvailableDays`] if every day is a holiday;
    /// [`ScheduleError::InvalidParameter`] if either solver config is
    /// unusable. Both are reported before any search starts.
    pub fn solve(
        &self,
        subjects: &[Subject],
        students: &[Student],
        calendar: &ExamCalendar,
    ) -> Result<Solution, ScheduleError> {
        let config = &self.config;
        config.annealing.validate()?;
        config.genetic.validate()?;
        let problem =
            ExamProblem::new(subjects, students, calendar.clone())?.with_penalty(config.penalty);

        let mut master = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let sa_seed: u64 = master.random();
        let ga_seed: u64 = master.random();
        debug!(
            subjects = problem.subject_count(),
            students = problem.student_count(),
            available_days = problem.candidate_days().len(),
            parallel = config.parallel,
            "solving exam schedule"
        );

        let termination = self.termination();
        let run_sa = || {
            let started = Instant::now();
            let mut rng = SmallRng::seed_from_u64(sa_seed);
            let result =
                AnnealingRunner::run(&problem, &config.annealing, &mut rng, &termination);
            (result, started.elapsed())
        };
        let run_ga = || {
            let started = Instant::now();
            let mut rng = SmallRng::seed_from_u64(ga_seed);
            let result = GaRunner::run(&problem, &config.genetic, &mut rng, &termination);
            (result, started.elapsed())
        };
        let ((sa, annealing_time), (ga, genetic_time)) = if config.parallel {
            rayon::join(run_sa, run_ga)
        } else {
            (run_sa(), run_ga())
        };
        let (sa, ga) = (sa?, ga?);
        debug!(?annealing_time, ?genetic_time, "solvers finished");

        let annealing_penalty = problem.evaluate(&sa.schedule);
        let genetic_penalty = problem.evaluate(&ga.schedule);

        let (schedule, penalty, algorithm) = if genetic_penalty < annealing_penalty {
            (ga.schedule, genetic_penalty, Algorithm::Genetic)
        } else {
            (sa.schedule, annealing_penalty, Algorithm::SimulatedAnnealing)
        };

        info!(
            %algorithm,
            penalty,
            annealing_penalty,
            genetic_penalty,
            "selected best schedule"
        );

        Ok(Solution {
            schedule,
            penalty,
            algorithm,
            annealing_penalty,
            genetic_penalty,
            annealing_time,
            genetic_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::penalty::{self, CONFLICT_PENALTY};

    fn quick_config() -> SchedulerConfig {
        SchedulerConfig::default()
            .with_seed(42)
            .with_annealing(AnnealingConfig::default().with_max_iterations(2_000))
            .with_genetic(
                GaConfig::default()
                    .with_population_size(20)
                    .with_generations(30),
            )
    }

    fn sample_instance() -> (Vec<Subject>, Vec<Student>) {
        let subjects: Vec<Subject> = (0..6).map(|i| Subject::new(format!("S{i}"))).collect();
        let students = vec![
            Student::new(1)
                .with_subject("S0", 7, 0)
                .with_subject("S1", 5, 1)
                .with_subject("S2", 9, 2),
            Student::new(2)
                .with_subject("S2", 4, 0)
                .with_subject("S3", 6, 0)
                .with_subject("S4", 3, 1),
            Student::new(3)
                .with_subject("S4", 8, 3)
                .with_subject("S5", 5, 0),
        ];
        (subjects, students)
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(Algorithm::SimulatedAnnealing.to_string(), "Simulated Annealing");
        assert_eq!(Algorithm::Genetic.to_string(), "Genetic Algorithm");
    }

    #[test]
    fn test_picks_lower_penalty() {
        let (subjects, students) = sample_instance();
        let solution = ExamScheduler::new(quick_config())
            .solve(&subjects, &students, &ExamCalendar::new(14).with_holidays([6, 7]))
            .unwrap();

        let best = solution.annealing_penalty.min(solution.genetic_penalty);
        assert_eq!(solution.penalty, best);
        assert!(solution.schedule.is_complete());
        assert_eq!(
            penalty::evaluate(&solution.schedule, &students, &PenaltyParams::default()),
            solution.penalty
        );
        match solution.algorithm {
            Algorithm::SimulatedAnnealing => {
                assert!(solution.annealing_penalty <= solution.genetic_penalty)
            }
            Algorithm::Genetic => assert!(solution.genetic_penalty < solution.annealing_penalty),
        }
    }

    #[test]
    fn test_tie_favors_annealing() {
        // One subject, nobody enrolled: both solvers score 0.
        let solution = ExamScheduler::new(quick_config())
            .solve(&[Subject::new("A")], &[], &ExamCalendar::new(5))
            .unwrap();
        assert_eq!(solution.penalty, 0.0);
        assert_eq!(solution.genetic_penalty, 0.0);
        assert_eq!(solution.algorithm, Algorithm::SimulatedAnnealing);
        assert!(solution.schedule.is_complete());
    }

    #[test]
    fn test_forced_conflict() {
        let subjects = vec![Subject::new("A"), Subject::new("B")];
        let students = vec![Student::new(0).with_subject("A", 5, 0).with_subject("B", 5, 0)];
        let solution = ExamScheduler::new(quick_config())
            .solve(&subjects, &students, &ExamCalendar::new(1))
            .unwrap();
        assert!(solution.penalty >= CONFLICT_PENALTY);
        assert!(solution.annealing_penalty >= CONFLICT_PENALTY);
        assert!(solution.genetic_penalty >= CONFLICT_PENALTY);
        assert!(!solution.is_conflict_free());
    }

    #[test]
    fn test_same_seed_same_solution() {
        let (subjects, students) = sample_instance();
        let cal = ExamCalendar::new(12);
        let a = ExamScheduler::new(quick_config())
            .solve(&subjects, &students, &cal)
            .unwrap();
        let b = ExamScheduler::new(quick_config())
            .solve(&subjects, &students, &cal)
            .unwrap();
        assert_eq!(a.penalty, b.penalty);
        assert_eq!(a.schedule.days(), b.schedule.days());
        assert_eq!(a.algorithm, b.algorithm);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let (subjects, students) = sample_instance();
        let cal = ExamCalendar::new(12);
        let seq = ExamScheduler::new(quick_config())
            .solve(&subjects, &students, &cal)
            .unwrap();
        let par = ExamScheduler::new(quick_config().with_parallel(true))
            .solve(&subjects, &students, &cal)
            .unwrap();
        assert_eq!(seq.annealing_penalty, par.annealing_penalty);
        assert_eq!(seq.genetic_penalty, par.genetic_penalty);
        assert_eq!(seq.schedule.days(), par.schedule.days());
    }

    #[test]
    fn test_reports_each_solver() {
        let (subjects, students) = sample_instance();
        let config = quick_config().with_genetic(
            GaConfig::default()
                .with_population_size(20)
                .with_generations(200),
        );
        let solution = ExamScheduler::new(config)
            .solve(&subjects, &students, &ExamCalendar::new(12))
            .unwrap();
        assert!(solution.genetic_time > Duration::ZERO);
        assert!(solution.annealing_time > Duration::ZERO);
    }

    #[test]
    fn test_cancelled_still_returns_schedule() {
        let (subjects, students) = sample_instance();
        let token = CancellationToken::new();
        token.cancel();
        let solution = ExamScheduler::new(quick_config())
            .with_cancellation(token)
            .solve(&subjects, &students, &ExamCalendar::new(12))
            .unwrap();
        assert!(solution.schedule.is_complete());
    }

    #[test]
    fn test_zero_time_limit_still_returns_schedule() {
        let (subjects, students) = sample_instance();
        let solution = ExamScheduler::new(quick_config().with_time_limit_ms(0))
            .solve(&subjects, &students, &ExamCalendar::new(12))
            .unwrap();
        assert!(solution.schedule.is_complete());
    }

    #[test]
    fn test_errors_before_search() {
        let (subjects, students) = sample_instance();
        let blocked = ExamCalendar::new(2).with_holidays([0, 1]);
        assert_eq!(
            ExamScheduler::default()
                .solve(&subjects, &students, &blocked)
                .unwrap_err(),
            ScheduleError::NoAvailableDays { num_days: 2 }
        );

        let bad = quick_config().with_genetic(GaConfig::default().with_population_size(0));
        let err = ExamScheduler::new(bad)
            .solve(&subjects, &students, &ExamCalendar::new(5))
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InvalidParameter {
                name: "population_size",
                ..
            }
        ));
    }

    #[test]
    fn test_penalty_params_flow_through() {
        let subjects = vec![Subject::new("A")];
        let students = vec![Student::new(0).with_subject("A", 2, 0)];
        let params = PenaltyParams::default().with_decay(0.0);
        let solution = ExamScheduler::new(quick_config().with_penalty(params))
            .solve(&subjects, &students, &ExamCalendar::new(3))
            .unwrap();
        // No decay: the lone exam costs difficulty² wherever it lands.
        assert_eq!(solution.penalty, 4.0);
    }

    #[test]
    fn test_config_json_defaults() {
        let config: SchedulerConfig =
            serde_json::from_str(r#"{"seed": 3, "genetic": {"elitism": true}}"#).unwrap();
        assert_eq!(config.seed, Some(3));
        assert!(config.genetic.elitism);
        assert_eq!(config.genetic.population_size, 50);
        assert_eq!(config.annealing, AnnealingConfig::default());
        assert!(!config.parallel);
        assert_eq!(config.time_limit_ms, None);
    }

    #[test]
    fn test_solution_json() {
        let solution = ExamScheduler::new(quick_config())
            .solve(&[Subject::new("A")], &[], &ExamCalendar::new(1))
            .unwrap();
        let json = serde_json::to_value(&solution).unwrap();
        assert_eq!(json["algorithm"], "simulated_annealing");
        assert_eq!(json["penalty"], 0.0);
        assert_eq!(json["schedule"][0]["subject"], "A");
        assert_eq!(json["schedule"][0]["day"], 0);
        assert!(json["annealing_time"].as_f64().is_some_and(|t| t >= 0.0));
        assert!(json["genetic_time"].as_f64().is_some_and(|t| t >= 0.0));
    }
}
