//! Exam timetabling for the U-Engine ecosystem.
//!
//! Assigns every subject of an exam period to one day so that no student
//! sits two exams on the same day and each student's exams are spread out
//! according to how hard they find them.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Subject`, `Student`, `ExamCalendar`,
//!   `Schedule`, `Assignment`
//! - **`penalty`**: Fatigue-aware penalty evaluator
//! - **`problem`**: Solve-ready instance with dense subject indexing
//! - **`initial`**: Random feasible starting schedule
//! - **`sa`**: Simulated annealing
//! - **`ga`**: Genetic algorithm
//! - **`scheduler`**: Best-of-two arbitration and schedule KPIs
//! - **`validation`**: Input integrity checks (duplicates, ratings, horizon)
//! - **`generator`**: Synthetic instances for experiments
//! - **`termination`**: Cancellation and deadlines shared by the solvers
//!
//! # Penalty model
//!
//! Two exams of one student on the same day cost `1e9` each. Every exam
//! adds `2^trials × difficulty² × e^(-gap)`, where `gap` is the number of
//! empty days since that student's previous exam. Lower is better.
//!
//! # References
//!
//! - Carter, Laporte & Lee (1996), "Examination Timetabling: Algorithmic
//!   Strategies and Applications"
//! - Qu et al. (2009), "A survey of search methodologies and automated
//!   system development for examination timetabling"

pub mod error;
pub mod ga;
pub mod generator;
pub mod initial;
pub mod models;
pub mod penalty;
pub mod problem;
pub mod sa;
pub mod scheduler;
pub mod termination;
pub mod validation;

pub use error::ScheduleError;
pub use ga::evolve;
pub use initial::initial_solution;
pub use problem::ExamProblem;
pub use sa::anneal;
pub use scheduler::{Algorithm, ExamScheduler, SchedulerConfig, Solution};
pub use termination::CancellationToken;
