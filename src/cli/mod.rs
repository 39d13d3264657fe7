//! CLI module for pomodoro-cycle.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `input`: Key bindings for the interactive session
//! - `display`: The terminal status line and one-shot output
//! - `lines`: Input line sources, including the stdin reader thread
//! - `session`: The interactive event loop

pub mod commands;
pub mod display;
pub mod input;
pub mod lines;
pub mod session;

pub use commands::{Cli, Commands, ConfigCommand, RunArgs, SetArgs};
pub use display::{Display, TerminalDisplay};
pub use input::{parse_line, SessionAction, KEY_HELP};
pub use lines::{LineSource, StdinLines};
pub use session::{Session, SessionEnd};
