//! Terminal display for timer sessions
//!
//! Renders the live countdown, cycle transitions and the history table.
//! Status output goes to stderr so stdout stays clean for the history table.

use std::io::Write as IoWrite;

use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::cycle::countdown::{format_countdown, Countdown};
use crate::cycle::model::{Cycle, CycleStatus};
use crate::cycle::ticker::TitleSurface;
use crate::cycle::validation::ValidationError;

/// Title surface for terminals: sets the window title through the OSC 0
/// escape and redraws a single status line on stderr.
#[derive(Debug, Default)]
pub struct TerminalTitle;

impl TitleSurface for TerminalTitle {
    fn set_title(&self, title: &str) {
        let mut stderr = std::io::stderr().lock();
        // Terminal output failures are not worth interrupting the timer for.
        let _ = write!(stderr, "\x1b]0;{title}\x07\r  {}  ", title.bold().cyan());
        let _ = stderr.flush();
    }
}

/// Display handler for cycle transitions
pub struct CycleDisplay {
    title_suffix: String,
}

impl CycleDisplay {
    /// Create a new display handler using `title_suffix` in status lines
    #[must_use]
    pub fn new(title_suffix: &str) -> Self {
        Self {
            title_suffix: title_suffix.to_string(),
        }
    }

    /// Print the banner when a cycle starts
    pub fn print_started(&self, cycle: &Cycle) {
        eprintln!(
            "\n{} {}",
            "===".bold().cyan(),
            format!("{} | {}", cycle.task, self.title_suffix).bold().cyan()
        );
        eprintln!(
            "  {} {} minutes, stop with `stop` or Ctrl-C",
            "Focus:".dimmed(),
            cycle.minutes_amount
        );
    }

    /// Print the summary when a cycle was interrupted
    pub fn print_interrupted(&self, cycle: &Cycle, seconds_passed: u64) {
        let (minutes, seconds) = format_countdown(seconds_passed);
        eprintln!(
            "\n  {} {} after {minutes}:{seconds}",
            "INTERRUPTED".yellow().bold(),
            cycle.task.bold()
        );
    }

    /// Print the summary when a cycle ran out
    pub fn print_finished(&self, cycle: &Cycle) {
        eprintln!(
            "\n  {} {} ({} minutes)",
            "FINISHED".green().bold(),
            cycle.task.bold(),
            cycle.minutes_amount
        );
    }

    /// Print the current countdown on demand
    pub fn print_status(&self, active: Option<&Cycle>, countdown: &Countdown) {
        match active {
            Some(cycle) => eprintln!("  {} {}", countdown.to_string().bold(), cycle.task),
            None => eprintln!("  {}", "No cycle running.".dimmed()),
        }
    }
}

/// Print a validation error the way a form shows a field message.
pub fn print_validation_error(err: &ValidationError) {
    eprintln!("  {} {err}", "✗".red().bold());
}

/// Human label for a cycle status
#[must_use]
pub const fn status_label(status: CycleStatus) -> &'static str {
    match status {
        CycleStatus::InProgress => "In progress",
        CycleStatus::Interrupted => "Interrupted",
        CycleStatus::Finished => "Finished",
    }
}

fn colored_status(status: CycleStatus, width: usize) -> String {
    let padded = format!("{:<width$}", status_label(status));
    match status {
        CycleStatus::InProgress => padded.yellow().to_string(),
        CycleStatus::Interrupted => padded.red().to_string(),
        CycleStatus::Finished => padded.green().to_string(),
    }
}

/// Describe how long ago `then` was, relative to `now`.
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let (amount, unit) = match secs {
        0..=59 => return "just now".to_string(),
        60..=3599 => (secs / 60, "minute"),
        3600..=86_399 => (secs / 3600, "hour"),
        _ => (secs / 86_400, "day"),
    };
    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

const TASK_WIDTH: usize = 32;
const DURATION_WIDTH: usize = 12;
const STARTED_WIDTH: usize = 16;
const STATUS_WIDTH: usize = 12;

/// Render the cycle history as a table, newest first.
#[must_use]
pub fn render_history_table(cycles: &[Cycle], now: DateTime<Utc>) -> String {
    if cycles.is_empty() {
        return "No cycles yet.".to_string();
    }

    let mut lines = vec![
        format!(
            "{:<TASK_WIDTH$} {:<DURATION_WIDTH$} {:<STARTED_WIDTH$} {:<STATUS_WIDTH$}",
            "Task", "Duration", "Started", "Status"
        )
        .bold()
        .to_string(),
        "─"
            .repeat(TASK_WIDTH + DURATION_WIDTH + STARTED_WIDTH + STATUS_WIDTH + 3)
            .dimmed()
            .to_string(),
    ];

    for cycle in cycles.iter().rev() {
        lines.push(format!(
            "{:<TASK_WIDTH$} {:<DURATION_WIDTH$} {:<STARTED_WIDTH$} {}",
            truncate(&cycle.task, TASK_WIDTH),
            format!("{} minutes", cycle.minutes_amount),
            relative_time(cycle.start_date, now),
            colored_status(cycle.status(), STATUS_WIDTH),
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{make_test_cycle, t0};
    use chrono::Duration;

    #[test]
    fn test_relative_time_buckets() {
        assert_eq!(relative_time(t0(), t0() + Duration::seconds(20)), "just now");
        assert_eq!(relative_time(t0(), t0() + Duration::seconds(60)), "1 minute ago");
        assert_eq!(relative_time(t0(), t0() + Duration::minutes(42)), "42 minutes ago");
        assert_eq!(relative_time(t0(), t0() + Duration::hours(1)), "1 hour ago");
        assert_eq!(relative_time(t0(), t0() + Duration::hours(5)), "5 hours ago");
        assert_eq!(relative_time(t0(), t0() + Duration::days(3)), "3 days ago");
    }

    #[test]
    fn test_relative_time_future_is_just_now() {
        assert_eq!(relative_time(t0() + Duration::minutes(5), t0()), "just now");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(CycleStatus::InProgress), "In progress");
        assert_eq!(status_label(CycleStatus::Interrupted), "Interrupted");
        assert_eq!(status_label(CycleStatus::Finished), "Finished");
    }

    #[test]
    fn test_history_table_empty() {
        assert_eq!(render_history_table(&[], t0()), "No cycles yet.");
    }

    #[test]
    fn test_history_table_newest_first() {
        colored::control::set_override(false);
        let mut first = make_test_cycle("1", "Write spec", 5);
        first.finished_date = Some(t0() + Duration::minutes(5));
        let mut second = make_test_cycle("2", "Review PR", 25);
        second.start_date = t0() + Duration::minutes(10);

        let table = render_history_table(&[first, second], t0() + Duration::minutes(40));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Task"));
        assert!(lines[2].starts_with("Review PR"));
        assert!(lines[2].contains("25 minutes"));
        assert!(lines[2].contains("30 minutes ago"));
        assert!(lines[2].contains("In progress"));
        assert!(lines[3].starts_with("Write spec"));
        assert!(lines[3].contains("40 minutes ago"));
        assert!(lines[3].contains("Finished"));
    }

    #[test]
    fn test_history_table_truncates_long_tasks() {
        colored::control::set_override(false);
        let cycle = make_test_cycle("1", &"x".repeat(80), 5);
        let table = render_history_table(&[cycle], t0());
        let row = table.lines().nth(2).unwrap();
        assert!(row.starts_with(&format!("{}...", "x".repeat(TASK_WIDTH - 3))));
    }

    #[test]
    fn test_print_helpers_do_not_panic() {
        let display = CycleDisplay::new("Ignite timer");
        let mut cycle = make_test_cycle("1", "Write spec", 5);
        display.print_started(&cycle);
        display.print_status(Some(&cycle), &Countdown::new(300, 10));
        display.print_status(None, &Countdown::idle());
        cycle.interrupted_date = Some(t0());
        display.print_interrupted(&cycle, 10);
        display.print_finished(&cycle);
        print_validation_error(&ValidationError::EmptyTask);
        TerminalTitle.set_title("04:50 | Ignite timer");
    }
}
