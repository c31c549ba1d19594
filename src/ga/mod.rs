//! GA-based exam scheduling.
//!
//! A generational genetic algorithm over complete schedules. Each individual
//! maps every subject to a candidate day; the population is fully replaced
//! every generation.
//!
//! # Encoding
//!
//! An individual is a [`Schedule`](crate::models::Schedule): one day slot per
//! subject, in dense subject-index order. Crossover segments are contiguous
//! in that order.
//!
//! # Submodules
//!
//! - [`operators`]: Roulette selection, segment crossover, reassign mutation
//!
//! # Reference
//! - Holland (1975), "Adaptation in Natural and Artificial Systems"
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"

pub mod operators;
mod runner;

pub use runner::{GaConfig, GaResult, GaRunner, evolve};
