//! Logging and observability
//!
//! This module provides the JSONL event log that records every cycle
//! transition of a session.

pub mod jsonl;

pub use jsonl::{CycleEvent, EventKind, JsonlLogger};
