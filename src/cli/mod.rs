//! CLI output formatting
//!
//! Provides human-readable terminal display for timer sessions:
//! countdown status, transitions and the history table.

pub mod display;

pub use display::print_validation_error;
pub use display::render_history_table;
pub use display::CycleDisplay;
pub use display::TerminalTitle;
