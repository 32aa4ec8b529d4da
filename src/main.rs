//! Pomo - Terminal pomodoro timer
//!
//! CLI entry point for the Pomo timer.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;

use pomo::cli::display::{print_validation_error, render_history_table, CycleDisplay};
use pomo::cli::TerminalTitle;
use pomo::cycle::clock::{Clock, SystemClock};
use pomo::cycle::config::PomoConfig;
use pomo::cycle::model::Cycle;
use pomo::cycle::session::Session;
use pomo::cycle::ticker::CycleNotice;
use pomo::cycle::validation::NewCycleData;
use pomo::log::{CycleEvent, EventKind, JsonlLogger};

/// Terminal pomodoro timer
///
/// Name a task, pick a duration and focus until the countdown runs out.
/// Every cycle is recorded as finished or interrupted.
#[derive(Parser, Debug)]
#[command(name = "pomo", version, about)]
struct Cli {
    /// Path to the pomo.toml configuration file (optional)
    #[arg(long, default_value = "pomo.toml", global = true)]
    config: PathBuf,

    /// Directory for the event log (.pomo by default)
    #[arg(long, default_value = ".pomo", global = true)]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session: start, stop and review cycles from the prompt
    Session,
    /// Run a single cycle and exit when it ends
    Start {
        /// What you are focusing on
        #[arg(long)]
        task: String,
        /// Duration in minutes (defaults to timer.default_minutes)
        #[arg(long)]
        minutes: Option<u32>,
    },
}

/// A line typed at the session prompt
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Start(NewCycleData),
    Stop,
    Status,
    History,
    Help,
    Quit,
    Empty,
}

/// Parse a prompt line. `start [minutes] <task>` uses `default_minutes`
/// when the first word is not a number.
fn parse_input(line: &str, default_minutes: u32) -> Result<Input, String> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "" => Ok(Input::Empty),
        "start" | "s" => {
            let (first, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let data = first.parse::<u32>().map_or_else(
                |_| NewCycleData::new(rest, default_minutes),
                |minutes| NewCycleData::new(tail.trim(), minutes),
            );
            Ok(Input::Start(data))
        }
        "stop" | "interrupt" => Ok(Input::Stop),
        "status" => Ok(Input::Status),
        "history" | "h" => Ok(Input::History),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        other => Err(format!("Unknown command '{other}'. Type `help` for commands.")),
    }
}

const HELP: &str = "\
Commands:
  start [minutes] <task>   start a cycle (e.g. `start 25 Write docs`)
  stop                     interrupt the running cycle
  status                   show the countdown
  history                  show all cycles of this session
  quit                     leave (interrupts a running cycle)";

/// Wires a session to the terminal and the event log.
struct App<C: Clock + 'static> {
    session: Session<C>,
    notices: UnboundedReceiver<CycleNotice>,
    logger: JsonlLogger,
    display: CycleDisplay,
}

impl<C: Clock + 'static> App<C> {
    fn log(&self, kind: EventKind, cycle: &Cycle) -> Result<()> {
        let event = CycleEvent::for_cycle(kind, cycle, self.session.seconds_passed());
        self.logger
            .append(&event)
            .context("Failed to write to JSONL log")
    }

    /// Start a cycle, reporting validation errors instead of failing.
    fn start(&mut self, data: &NewCycleData) -> Result<bool> {
        match self.session.start(data) {
            Ok(cycle) => {
                self.display.print_started(&cycle);
                self.log(EventKind::Created, &cycle)?;
                Ok(true)
            }
            Err(err) => {
                print_validation_error(&err);
                Ok(false)
            }
        }
    }

    fn interrupt(&mut self) -> Result<()> {
        if let Some(cycle) = self.session.interrupt() {
            self.display
                .print_interrupted(&cycle, self.session.seconds_passed());
            self.log(EventKind::Interrupted, &cycle)?;
        }
        Ok(())
    }

    fn on_notice(&self, notice: CycleNotice) -> Result<()> {
        match notice {
            CycleNotice::Finished(cycle) => {
                self.display.print_finished(&cycle);
                self.log(EventKind::Finished, &cycle)
            }
        }
    }

    fn print_history(&self, now: chrono::DateTime<chrono::Utc>) {
        println!("{}", render_history_table(&self.session.cycles(), now));
    }

    /// Run one cycle until it finishes or Ctrl-C interrupts it.
    async fn run_once(&mut self, data: &NewCycleData) -> Result<bool> {
        if !self.start(data)? {
            return Ok(false);
        }

        tokio::select! {
            notice = self.notices.recv() => {
                if let Some(notice) = notice {
                    self.on_notice(notice)?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                self.interrupt()?;
            }
        }
        Ok(true)
    }

    /// Read commands from stdin until `quit`, end of input or a Ctrl-C
    /// while idle.
    async fn run_interactive(&mut self) -> Result<()> {
        let default_minutes = self.session.config().default_minutes;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        eprintln!("{HELP}");

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("Failed to read from stdin")? else {
                        break;
                    };
                    match parse_input(&line, default_minutes) {
                        Ok(Input::Start(data)) => {
                            self.start(&data)?;
                        }
                        Ok(Input::Stop) => self.interrupt()?,
                        Ok(Input::Status) => self
                            .display
                            .print_status(self.session.active_cycle().as_ref(), &self.session.countdown()),
                        Ok(Input::History) => self.print_history(chrono::Utc::now()),
                        Ok(Input::Help) => eprintln!("{HELP}"),
                        Ok(Input::Quit) => break,
                        Ok(Input::Empty) => {}
                        Err(message) => eprintln!("  {message}"),
                    }
                }
                Some(notice) = self.notices.recv() => {
                    self.on_notice(notice)?;
                }
                _ = tokio::signal::ctrl_c() => {
                    if self.session.active_cycle().is_none() {
                        break;
                    }
                    self.interrupt()?;
                }
            }
        }

        self.interrupt()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = PomoConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))?;

    // Initialize
    let logger = JsonlLogger::new(&cli.log_dir).context("Failed to initialize JSONL logger")?;
    let display = CycleDisplay::new(&config.timer.title_suffix);
    let default_minutes = config.timer.default_minutes;
    let (session, notices) = Session::new(SystemClock, config.timer, Arc::new(TerminalTitle));
    let mut app = App {
        session,
        notices,
        logger,
        display,
    };

    match cli.command.unwrap_or(Command::Session) {
        Command::Session => app.run_interactive().await?,
        Command::Start { task, minutes } => {
            let data = NewCycleData::new(&task, minutes.unwrap_or(default_minutes));
            if !app.run_once(&data).await? {
                std::process::exit(2);
            }
        }
    }

    app.print_history(SystemClock.now());
    Ok(())
}
