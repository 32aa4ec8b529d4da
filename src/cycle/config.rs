//! Timer configuration parser
//!
//! Parses `pomo.toml` into the settings that shape a session: duration
//! bounds, the default duration, the tick period and the title suffix.

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::cycle::validation::{CycleBounds, DEFAULT_MAX_MINUTES, DEFAULT_MIN_MINUTES};

/// Timer settings under the `[timer]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TimerConfig {
    /// Shortest allowed cycle in minutes (default: 5)
    #[serde(default = "default_min_minutes")]
    pub min_minutes: u32,
    /// Longest allowed cycle in minutes (default: 60)
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
    /// Duration used when none is given (default: 5)
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
    /// Milliseconds between ticks (default: 1000)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Text after the countdown in the terminal title
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,
}

const fn default_min_minutes() -> u32 {
    DEFAULT_MIN_MINUTES
}

const fn default_max_minutes() -> u32 {
    DEFAULT_MAX_MINUTES
}

const fn default_minutes() -> u32 {
    DEFAULT_MIN_MINUTES
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_title_suffix() -> String {
    "Ignite timer".to_string()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            min_minutes: default_min_minutes(),
            max_minutes: default_max_minutes(),
            default_minutes: default_minutes(),
            tick_interval_ms: default_tick_interval_ms(),
            title_suffix: default_title_suffix(),
        }
    }
}

impl TimerConfig {
    /// Duration bounds enforced when creating cycles.
    #[must_use]
    pub const fn bounds(&self) -> CycleBounds {
        CycleBounds {
            min_minutes: self.min_minutes,
            max_minutes: self.max_minutes,
        }
    }

    /// Period between ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Top-level configuration parsed from pomo.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PomoConfig {
    /// Timer settings
    #[serde(default)]
    pub timer: TimerConfig,
}

impl PomoConfig {
    /// Parse a pomo.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse pomo.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse pomo.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let timer = &self.timer;

        if timer.min_minutes == 0 {
            bail!("timer.min_minutes must be at least 1");
        }

        if timer.max_minutes < timer.min_minutes {
            bail!(
                "timer.max_minutes ({}) must not be less than timer.min_minutes ({})",
                timer.max_minutes,
                timer.min_minutes
            );
        }

        if !(timer.min_minutes..=timer.max_minutes).contains(&timer.default_minutes) {
            bail!(
                "timer.default_minutes ({}) must be between {} and {}",
                timer.default_minutes,
                timer.min_minutes,
                timer.max_minutes
            );
        }

        if timer.tick_interval_ms == 0 {
            bail!("timer.tick_interval_ms must be greater than zero");
        }

        Ok(())
    }
}
