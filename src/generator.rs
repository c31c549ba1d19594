//! Synthetic exam instance generator.
//!
//! Builds two disjoint subject sets, a cohort of students taking all of
//! set A, a cohort taking all of set B, and a few "mixed" students taking a
//! random selection from both. Each subject has a mean difficulty; a
//! student's rating is drawn from a normal distribution around it,
//! truncated and clamped to 1..=10.

use rand::Rng;
use rand::prelude::IndexedRandom;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScheduleError;
use crate::models::{Student, Subject};
use crate::validation::{MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Shape of a generated instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Subjects in set A.
    pub set_a_size: usize,
    /// Subjects in set B.
    pub set_b_size: usize,
    /// Students per set cohort.
    pub students_per_set: usize,
    /// Students picking from both sets.
    pub mixed_students: usize,
    /// Fewest subjects a mixed student takes.
    pub mixed_min_subjects: usize,
    /// Most subjects a mixed student takes.
    pub mixed_max_subjects: usize,
    /// Lower bound of a subject's mean difficulty.
    pub min_mean_difficulty: f64,
    /// Upper bound of a subject's mean difficulty.
    pub max_mean_difficulty: f64,
    /// Spread of individual ratings around the subject mean.
    pub difficulty_std_dev: f64,
    /// Highest number of prior attempts.
    pub max_trials: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            set_a_size: 5,
            set_b_size: 7,
            students_per_set: 10,
            mixed_students: 5,
            mixed_min_subjects: 5,
            mixed_max_subjects: 7,
            min_mean_difficulty: 3.0,
            max_mean_difficulty: 8.0,
            difficulty_std_dev: 1.5,
            max_trials: 3,
        }
    }
}

impl GeneratorConfig {
    /// Sets the sizes of both subject sets.
    pub fn with_set_sizes(mut self, set_a: usize, set_b: usize) -> Self {
        self.set_a_size = set_a;
        self.set_b_size = set_b;
        self
    }

    /// Sets the cohort sizes.
    pub fn with_students(mut self, per_set: usize, mixed: usize) -> Self {
        self.students_per_set = per_set;
        self.mixed_students = mixed;
        self
    }

    /// Sets how many subjects each mixed student takes.
    pub fn with_mixed_range(mut self, min: usize, max: usize) -> Self {
        self.mixed_min_subjects = min;
        self.mixed_max_subjects = max;
        self
    }

    /// Sets the rating spread.
    pub fn with_difficulty_std_dev(mut self, std_dev: f64) -> Self {
        self.difficulty_std_dev = std_dev;
        self
    }

    fn validate(&self) -> Result<(), ScheduleError> {
        if self.mixed_min_subjects > self.mixed_max_subjects {
            return Err(ScheduleError::invalid_parameter(
                "mixed_min_subjects",
                format!(
                    "{} exceeds mixed_max_subjects {}",
                    self.mixed_min_subjects, self.mixed_max_subjects
                ),
            ));
        }
        if !(self.min_mean_difficulty <= self.max_mean_difficulty) {
            return Err(ScheduleError::invalid_parameter(
                "min_mean_difficulty",
                format!(
                    "{} exceeds max_mean_difficulty {}",
                    self.min_mean_difficulty, self.max_mean_difficulty
                ),
            ));
        }
        if self.difficulty_std_dev.is_nan() || self.difficulty_std_dev < 0.0 {
            return Err(ScheduleError::invalid_parameter(
                "difficulty_std_dev",
                format!("must be non-negative, got {}", self.difficulty_std_dev),
            ));
        }
        Ok(())
    }
}

/// A complete scheduling input: subjects and their students.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExamInstance {
    /// Subjects to schedule, in order.
    pub subjects: Vec<Subject>,
    /// Enrolled students.
    #[serde(default)]
    pub students: Vec<Student>,
}

/// Generates a random instance.
///
/// Student ids are sequential: set A cohort first, then set B, then the
/// mixed students. Mixed students take at most every subject.
///
/// # Errors
/// [`ScheduleError::InvalidParameter`] for inconsistent ranges or a
/// negative rating spread; [`ScheduleError::Distribution`] if the spread is
/// not finite.
pub fn generate<R: Rng>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<ExamInstance, ScheduleError> {
    config.validate()?;

    let set_a: Vec<Subject> = (1..=config.set_a_size)
        .map(|i| Subject::new(format!("A{i}")))
        .collect();
    let set_b: Vec<Subject> = (1..=config.set_b_size)
        .map(|i| Subject::new(format!("B{i}")))
        .collect();
    let all: Vec<Subject> = set_a.iter().chain(set_b.iter()).cloned().collect();

    let ratings = all
        .iter()
        .map(|_| {
            let mean = rng.random_range(config.min_mean_difficulty..=config.max_mean_difficulty);
            Normal::new(mean, config.difficulty_std_dev)
                .map_err(|e| ScheduleError::Distribution(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // `all` is set A followed by set B, so a subject's rating distribution
    // is found by its position there.
    let enroll = |student: &mut Student, position: usize, rng: &mut R| {
        let raw = ratings[position].sample(rng).trunc();
        let difficulty = raw.clamp(f64::from(MIN_DIFFICULTY), f64::from(MAX_DIFFICULTY)) as u8;
        let trials = rng.random_range(0..=config.max_trials);
        student.add_subject(all[position].clone(), difficulty, trials);
    };

    let mut students = Vec::with_capacity(2 * config.students_per_set + config.mixed_students);
    let mut next_id = 0u32;

    for (offset, size) in [(0, set_a.len()), (set_a.len(), set_b.len())] {
        for _ in 0..config.students_per_set {
            let mut student = Student::new(next_id);
            next_id += 1;
            for position in offset..offset + size {
                enroll(&mut student, position, rng);
            }
            students.push(student);
        }
    }

    let positions: Vec<usize> = (0..all.len()).collect();
    let max_take = config.mixed_max_subjects.min(all.len());
    let min_take = config.mixed_min_subjects.min(max_take);
    for _ in 0..config.mixed_students {
        let mut student = Student::new(next_id);
        next_id += 1;
        let take = rng.random_range(min_take..=max_take);
        let picked: Vec<usize> = positions.choose_multiple(rng, take).copied().collect();
        for position in picked {
            enroll(&mut student, position, rng);
        }
        students.push(student);
    }

    debug!(
        subjects = all.len(),
        students = students.len(),
        "generated exam instance"
    );

    Ok(ExamInstance {
        subjects: all,
        students,
    })
}
