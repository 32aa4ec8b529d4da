//! Cycle records
//!
//! A `Cycle` is one timer run: a task label, a duration in minutes and the
//! timestamps that mark when it started and how it ended.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier of a cycle, derived from its creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(String);

impl CycleId {
    /// Build an id from the millisecond timestamp of `at`.
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }

    /// Build an id from a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derived lifecycle state of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Neither interrupted nor finished
    InProgress,
    /// Cancelled by the user before the countdown ran out
    Interrupted,
    /// The countdown reached zero
    Finished,
}

/// One timer run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    /// Unique identifier
    pub id: CycleId,
    /// Free-text task label
    pub task: String,
    /// Duration in whole minutes
    pub minutes_amount: u32,
    /// When the cycle became active
    pub start_date: DateTime<Utc>,
    /// Set when the user cancels the cycle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted_date: Option<DateTime<Utc>>,
    /// Set when the countdown runs out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_date: Option<DateTime<Utc>>,
}

impl Cycle {
    /// Create a fresh cycle that started at `start_date`.
    #[must_use]
    pub fn new(id: CycleId, task: &str, minutes_amount: u32, start_date: DateTime<Utc>) -> Self {
        Self {
            id,
            task: task.to_string(),
            minutes_amount,
            start_date,
            interrupted_date: None,
            finished_date: None,
        }
    }

    /// Total length of the cycle in seconds.
    #[must_use]
    pub const fn total_seconds(&self) -> u64 {
        self.minutes_amount as u64 * 60
    }

    /// Whole seconds between `start_date` and `now`, never negative.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((now - self.start_date).num_seconds()).unwrap_or(0)
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> CycleStatus {
        if self.finished_date.is_some() {
            CycleStatus::Finished
        } else if self.interrupted_date.is_some() {
            CycleStatus::Interrupted
        } else {
            CycleStatus::InProgress
        }
    }

    /// True once the cycle has been interrupted or finished.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.interrupted_date.is_some() || self.finished_date.is_some()
    }
}
