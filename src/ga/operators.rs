//! Genetic operators for exam schedules.
//!
//! - **Selection**: fitness-proportionate (roulette wheel) with replacement,
//!   falling back to uniform sampling when no individual has usable fitness.
//! - **Crossover**: contiguous-segment crossover over the subject index
//!   order. The child copies parent 1 and takes parent 2's days for one
//!   segment of subjects.
//! - **Mutation**: move one random subject to one random candidate day.
//!
//! # Reference
//! Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//! Machine Learning", Ch. 3

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;

use crate::models::Schedule;
use crate::problem::ExamProblem;

/// Fitness of a penalty: `1 / (1 + penalty)`, or 0 if the penalty is not
/// finite.
#[inline]
pub fn fitness(penalty: f64) -> f64 {
    if penalty.is_finite() {
        1.0 / (1.0 + penalty)
    } else {
        0.0
    }
}

/// Fitness-proportionate parent selector for one generation.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    weights: Option<WeightedIndex<f64>>,
    len: usize,
}

impl RouletteWheel {
    /// Builds a wheel over the given fitness values.
    ///
    /// If the total fitness is zero (or the weights are otherwise unusable)
    /// every individual is equally likely.
    pub fn new(fitness: &[f64]) -> Self {
        let total: f64 = fitness.iter().sum();
        let weights = if total > 0.0 {
            WeightedIndex::new(fitness.iter()).ok()
        } else {
            None
        };
        Self {
            weights,
            len: fitness.len(),
        }
    }

    /// Whether selection ignores fitness.
    pub fn is_uniform(&self) -> bool {
        self.weights.is_none()
    }

    /// Draws one index. The wheel must not be empty.
    pub fn select<R: Rng>(&self, rng: &mut R) -> usize {
        match &self.weights {
            Some(weights) => weights.sample(rng),
            None => rng.random_range(0..self.len),
        }
    }
}

/// Copies `parent1` and overwrites subjects `start..=end` (dense index order)
/// with `parent2`'s days.
///
/// Both parents must come from the same problem. Indices past the last
/// subject are ignored.
pub fn crossover_segment(
    parent1: &Schedule,
    parent2: &Schedule,
    start: usize,
    end: usize,
) -> Schedule {
    let mut child = parent1.clone();
    let last = parent1.days().len().min(parent2.days().len());
    for idx in start..=end.min(last.saturating_sub(1)) {
        if let Some(day) = parent2.day_at(idx) {
            child.assign_index(idx, day);
        }
    }
    child
}

/// Segment crossover with `start` uniform over all subjects and `end`
/// uniform over `start..n`.
pub fn segment_crossover<R: Rng>(
    parent1: &Schedule,
    parent2: &Schedule,
    rng: &mut R,
) -> Schedule {
    let n = parent1.days().len();
    if n == 0 {
        return parent1.clone();
    }
    let start = rng.random_range(0..n);
    let end = rng.random_range(start..n);
    crossover_segment(parent1, parent2, start, end)
}

/// With probability `rate`, moves one random subject to a random candidate
/// day. Returns whether a mutation happened.
pub fn reassign_mutation<R: Rng>(
    problem: &ExamProblem,
    schedule: &mut Schedule,
    rate: f64,
    rng: &mut R,
) -> bool {
    if rng.random::<f64>() < rate {
        problem.reassign_random(schedule, rng);
        true
    } else {
        false
    }
}
