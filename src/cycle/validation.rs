//! New cycle validation
//!
//! Checks the data a user submits before a cycle is created. Failures are
//! reported as `ValidationError` values so the front end can show them next
//! to the input instead of aborting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default shortest allowed cycle, in minutes
pub const DEFAULT_MIN_MINUTES: u32 = 5;
/// Default longest allowed cycle, in minutes
pub const DEFAULT_MAX_MINUTES: u32 = 60;

/// Reasons a cycle cannot be created
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Task label is empty or only whitespace
    #[error("Please enter the task")]
    EmptyTask,
    /// Duration below the configured minimum
    #[error("The cycle must be at least {min} minutes")]
    TooShort {
        /// Configured minimum
        min: u32,
    },
    /// Duration above the configured maximum
    #[error("The cycle must be at most {max} minutes")]
    TooLong {
        /// Configured maximum
        max: u32,
    },
    /// Another cycle is still counting down
    #[error("A cycle is already running; stop it before starting a new one")]
    CycleAlreadyActive,
}

/// Inclusive range of allowed durations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleBounds {
    /// Shortest allowed cycle in minutes
    pub min_minutes: u32,
    /// Longest allowed cycle in minutes
    pub max_minutes: u32,
}

impl Default for CycleBounds {
    fn default() -> Self {
        Self {
            min_minutes: DEFAULT_MIN_MINUTES,
            max_minutes: DEFAULT_MAX_MINUTES,
        }
    }
}

/// Data submitted to start a new cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCycleData {
    /// Task label
    pub task: String,
    /// Requested duration in minutes
    pub minutes_amount: u32,
}

impl NewCycleData {
    /// Convenience constructor.
    #[must_use]
    pub fn new(task: &str, minutes_amount: u32) -> Self {
        Self {
            task: task.to_string(),
            minutes_amount,
        }
    }

    /// Check the task label and duration against `bounds`.
    ///
    /// The task is checked first, matching the order fields appear in the form.
    pub fn validate(&self, bounds: &CycleBounds) -> Result<(), ValidationError> {
        if self.task.trim().is_empty() {
            return Err(ValidationError::EmptyTask);
        }
        if self.minutes_amount < bounds.min_minutes {
            return Err(ValidationError::TooShort {
                min: bounds.min_minutes,
            });
        }
        if self.minutes_amount > bounds.max_minutes {
            return Err(ValidationError::TooLong {
                max: bounds.max_minutes,
            });
        }
        Ok(())
    }
}
