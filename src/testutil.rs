//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeZone, Utc};

use crate::cycle::clock::ManualClock;
use crate::cycle::model::{Cycle, CycleId};
use crate::cycle::store::CycleStore;
use crate::cycle::ticker::TitleSurface;

/// Fixed reference instant used as "now" at the start of tests.
#[must_use]
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// Create an empty store driven by a `ManualClock` frozen at [`t0`].
///
/// Returns the clock too so the test can advance it.
#[must_use]
pub fn make_test_store() -> (CycleStore<ManualClock>, ManualClock) {
    let clock = ManualClock::new(t0());
    (CycleStore::new(clock.clone()), clock)
}

/// Create an in-progress cycle that started at [`t0`].
#[must_use]
pub fn make_test_cycle(id: &str, task: &str, minutes_amount: u32) -> Cycle {
    Cycle::new(CycleId::new(id), task, minutes_amount, t0())
}

/// Title surface that remembers every title it was given.
#[derive(Debug, Default)]
pub struct RecordingTitle {
    titles: Mutex<Vec<String>>,
}

impl RecordingTitle {
    /// All titles so far, oldest first.
    pub fn titles(&self) -> Vec<String> {
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent title.
    pub fn last(&self) -> Option<String> {
        self.titles().last().cloned()
    }
}

impl TitleSurface for RecordingTitle {
    fn set_title(&self, title: &str) {
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(title.to_string());
    }
}
