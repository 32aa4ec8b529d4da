//! Countdown formatting
//!
//! Turns remaining seconds into the `mm:ss` pair shown on screen and in the
//! terminal title.

use std::fmt;

/// Split `remaining_seconds` into zero-padded minutes and seconds.
#[must_use]
pub fn format_countdown(remaining_seconds: u64) -> (String, String) {
    let minutes = remaining_seconds / 60;
    let seconds = remaining_seconds % 60;
    (format!("{minutes:02}"), format!("{seconds:02}"))
}

/// Remaining time of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
}

impl Countdown {
    /// Remaining time given the cycle length and the seconds already elapsed.
    #[must_use]
    pub const fn new(total_seconds: u64, elapsed_seconds: u64) -> Self {
        Self {
            remaining: total_seconds.saturating_sub(elapsed_seconds),
        }
    }

    /// Countdown with `remaining_seconds` left.
    #[must_use]
    pub const fn from_remaining(remaining_seconds: u64) -> Self {
        Self {
            remaining: remaining_seconds,
        }
    }

    /// Countdown shown while no cycle runs.
    #[must_use]
    pub const fn idle() -> Self {
        Self { remaining: 0 }
    }

    /// Remaining seconds.
    #[must_use]
    pub const fn remaining_seconds(&self) -> u64 {
        self.remaining
    }

    /// Minutes and seconds as two-digit strings.
    #[must_use]
    pub fn parts(&self) -> (String, String) {
        format_countdown(self.remaining)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (minutes, seconds) = self.parts();
        write!(f, "{minutes}:{seconds}")
    }
}

/// Window title shown while a cycle runs, e.g. `04:59 | Ignite timer`.
#[must_use]
pub fn page_title(countdown: &Countdown, suffix: &str) -> String {
    format!("{countdown} | {suffix}")
}
