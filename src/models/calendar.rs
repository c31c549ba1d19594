//! Exam calendar: scheduling horizon and blocked days.
//!
//! Days are zero-based indices into a horizon of `num_days` days.
//!
//! # Precedence
//! Holidays override the horizon. A day is available iff:
//! - It is inside `[0, num_days)`, AND
//! - It is NOT listed in `holidays`.
//!
//! Holidays outside the horizon are kept but have no effect.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::ScheduleError;

/// Scheduling horizon with blocked days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamCalendar {
    /// Number of days in the horizon.
    pub num_days: u32,
    /// Blocked day indices.
    #[serde(default)]
    pub holidays: BTreeSet<u32>,
}

impl ExamCalendar {
    /// Creates a calendar without holidays.
    pub fn new(num_days: u32) -> Self {
        Self {
            num_days,
            holidays: BTreeSet::new(),
        }
    }

    /// Blocks a single day.
    pub fn with_holiday(mut self, day: u32) -> Self {
        self.holidays.insert(day);
        self
    }

    /// Blocks several days.
    pub fn with_holidays(mut self, days: impl IntoIterator<Item = u32>) -> Self {
        self.holidays.extend(days);
        self
    }

    /// Whether a day is blocked.
    #[inline]
    pub fn is_holiday(&self, day: u32) -> bool {
        self.holidays.contains(&day)
    }

    /// Whether an exam may be placed on this day.
    #[inline]
    pub fn is_available(&self, day: u32) -> bool {
        day < self.num_days && !self.is_holiday(day)
    }

    /// Available days in ascending order (possibly empty).
    pub fn available_days(&self) -> Vec<u32> {
        (0..self.num_days).filter(|&d| !self.is_holiday(d)).collect()
    }

    /// Candidate days for exam placement.
    ///
    /// # Errors
    /// [`ScheduleError::NoAvailableDays`] if every day is blocked or the
    /// horizon is empty.
    pub fn candidate_days(&self) -> Result<Vec<u32>, ScheduleError> {
        let days = self.available_days();
        if days.is_empty() {
            return Err(ScheduleError::NoAvailableDays {
                num_days: self.num_days,
            });
        }
        Ok(days)
    }

    /// Number of available days.
    pub fn available_day_count(&self) -> usize {
        let blocked = self.holidays.range(..self.num_days).count();
        self.num_days as usize - blocked
    }
}
