//! Command definitions for the pomodoro-cycle CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::parse_minutes;

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomodoro Cycle - a work/break countdown for the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-cycle",
    version,
    about = "Work/break Pomodoro countdown for the terminal",
    long_about = "A Pomodoro timer that alternates work and break phases.\n\
                  Press Enter to start or pause, 'r' to reset and 'n' to skip to the next phase.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the stored durations (defaults to the user config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Show or change the stored durations
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// `config` subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommand {
    /// Print the stored durations
    Show,

    /// Store new durations
    Set(SetArgs),

    /// Restore the default durations
    Reset,
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Disable the alert sound (the terminal bell is still used)
    #[arg(long)]
    pub no_sound: bool,

    /// Alert sound: "chime", a system sound name or a file path
    #[arg(long, value_name = "NAME|PATH", conflicts_with = "no_sound")]
    pub sound: Option<String>,

    /// Do not post desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Keep the display awake while a countdown runs
    #[arg(long)]
    pub keep_awake: bool,
}

// ============================================================================
// Config Set Arguments
// ============================================================================

/// Arguments for `config set`
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = true)]
pub struct SetArgs {
    /// Work duration in minutes
    #[arg(short, long, value_name = "MIN", value_parser = validate_minutes)]
    pub work: Option<String>,

    /// Break duration in minutes
    #[arg(short, long = "break", value_name = "MIN", value_parser = validate_minutes)]
    pub break_time: Option<String>,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates a minute count.
///
/// Accepts what the session would resolve to a positive number of minutes,
/// and returns the trimmed text as it will be stored.
fn validate_minutes(s: &str) -> Result<String, String> {
    match parse_minutes(s) {
        Some(_) => Ok(s.trim().to_string()),
        None => Err(format!("'{}' is not a positive number of minutes", s)),
    }
}

// ============================================================================
// Tests
// ============================================================================
