//! Solver arbitration and KPI evaluation.
//!
//! Runs both metaheuristics on the same instance and keeps the better
//! schedule, then reports quality metrics for it.
//!
//! # Algorithm
//!
//! `ExamScheduler` resolves the instance once, runs simulated annealing and
//! the genetic algorithm (one after the other, or on `rayon::join`), scores
//! both schedules with the same evaluator and returns the lower one. Ties go
//! to simulated annealing.
//!
//! # KPI
//!
//! `ScheduleKpi` computes total penalty, conflict count, per-student
//! penalties, tightest exam spacing, days used and feasibility counts.
//!
//! # References
//!
//! - Carter, Laporte & Lee (1996), "Examination Timetabling: Algorithmic
//!   Strategies and Applications"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

mod arbiter;
mod kpi;

pub use arbiter::{Algorithm, ExamScheduler, SchedulerConfig, Solution};
pub use kpi::ScheduleKpi;
