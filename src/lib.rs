//! Pomo - Terminal pomodoro timer
//!
//! Pomo runs focus cycles: name a task, pick a duration, and the timer counts
//! down, records whether each cycle finished or was interrupted, and shows
//! the session history as a table.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod cli;
pub mod cycle;
pub mod log;

#[cfg(test)]
pub mod testutil;

// Re-export commonly used types
pub use cli::{render_history_table, CycleDisplay, TerminalTitle};
pub use cycle::clock::{Clock, ManualClock, SystemClock};
pub use cycle::config::{PomoConfig, TimerConfig};
pub use cycle::countdown::{format_countdown, page_title, Countdown};
pub use cycle::model::{Cycle, CycleId, CycleStatus};
pub use cycle::reducer::{reduce, CycleAction, CyclesState};
pub use cycle::session::Session;
pub use cycle::store::{CycleStore, TickOutcome};
pub use cycle::ticker::{CycleNotice, Ticker, TitleSurface};
pub use cycle::validation::{CycleBounds, NewCycleData, ValidationError};
pub use log::{CycleEvent, EventKind, JsonlLogger};
