//! JSONL (JSON Lines) event log for cycle transitions
//!
//! Provides append-only logging of cycle transitions to `.pomo/events.jsonl`.
//! The log is an audit trail only; sessions never rebuild state from it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use crate::cycle::model::{Cycle, CycleId};

/// Which transition an event records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A cycle was created and became active
    Created,
    /// The active cycle was cancelled
    Interrupted,
    /// The active cycle ran to completion
    Finished,
}

/// One cycle transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleEvent {
    /// When the transition happened
    pub timestamp: DateTime<Utc>,
    /// What happened
    pub kind: EventKind,
    /// Id of the affected cycle
    pub cycle_id: CycleId,
    /// Task label of the affected cycle
    pub task: String,
    /// Planned duration in minutes
    pub minutes_amount: u32,
    /// Seconds elapsed as of the transition
    pub seconds_passed: u64,
}

impl CycleEvent {
    /// Build an event for `cycle`, timestamped with the matching stamp on the
    /// cycle (start, interrupted or finished date).
    #[must_use]
    pub fn for_cycle(kind: EventKind, cycle: &Cycle, seconds_passed: u64) -> Self {
        let timestamp = match kind {
            EventKind::Created => Some(cycle.start_date),
            EventKind::Interrupted => cycle.interrupted_date,
            EventKind::Finished => cycle.finished_date,
        }
        .unwrap_or_else(Utc::now);

        Self {
            timestamp,
            kind,
            cycle_id: cycle.id.clone(),
            task: cycle.task.clone(),
            minutes_amount: cycle.minutes_amount,
            seconds_passed,
        }
    }
}

/// JSONL logger for cycle transitions
///
/// Provides append-only logging to `.pomo/events.jsonl`.
/// Each line is a JSON object representing a single transition.
pub struct JsonlLogger {
    log_path: PathBuf,
}

impl JsonlLogger {
    /// Create a new JSONL logger
    ///
    /// # Arguments
    /// * `log_dir` - Directory where events.jsonl will be stored (typically `.pomo`)
    ///
    /// # Errors
    /// Returns an error if the log directory cannot be created
    pub fn new<P: AsRef<Path>>(log_dir: P) -> Result<Self> {
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

        let log_path = log_dir.join("events.jsonl");

        Ok(Self { log_path })
    }

    /// Append an event to the log
    ///
    /// # Errors
    /// Returns an error if:
    /// - The log file cannot be opened or created
    /// - The event cannot be serialized to JSON
    /// - Writing to the file fails
    pub fn append(&self, event: &CycleEvent) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open log file: {}", self.log_path.display()))?;

        let json = serde_json::to_string(event).context("Failed to serialize cycle event to JSON")?;

        writeln!(file, "{json}").context("Failed to write to log file")?;

        Ok(())
    }

    /// Read all events from the log, oldest first
    ///
    /// # Errors
    /// Returns an error if:
    /// - The log file cannot be read
    /// - Any line cannot be parsed as valid JSON
    pub fn read_all(&self) -> Result<Vec<CycleEvent>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.log_path)
            .with_context(|| format!("Failed to read log file: {}", self.log_path.display()))?;

        let mut events = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let event: CycleEvent = serde_json::from_str(line)
                .with_context(|| format!("Failed to parse line {} as JSON", line_num + 1))?;

            events.push(event);
        }

        Ok(events)
    }

    /// Get the path to the log file
    #[must_use]
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}
