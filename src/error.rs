//! Error types for exam scheduling.
//!
//! Only configuration problems are errors. Same-day conflicts are never
//! raised: they are priced into the penalty so the solvers can still compare
//! and improve infeasible schedules.

use thiserror::Error;

/// Errors raised before or while setting up a solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// Every day of the horizon is a holiday (or the horizon is empty).
    #[error("invalid configuration: no available exam days in a {num_days}-day horizon")]
    NoAvailableDays {
        /// Horizon length that was requested.
        num_days: u32,
    },

    /// A solver tuning parameter is outside its usable range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the config struct.
        name: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// A sampling distribution could not be built (instance generator).
    #[error("distribution error: {0}")]
    Distribution(String),
}

impl ScheduleError {
    /// Creates an invalid parameter error.
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether this error stems from the instance configuration
    /// (horizon/holidays) rather than from solver tuning.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::NoAvailableDays { .. })
    }
}
