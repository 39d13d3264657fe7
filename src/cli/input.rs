//! Key bindings for the interactive session.
//!
//! Input is line oriented: each line read from stdin is one action.

use crate::types::Command;

/// One thing the user asked the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// A timer command
    Command(Command),
    /// New work duration text
    SetWork(String),
    /// New break duration text
    SetBreak(String),
    /// Print the key help
    Help,
    /// End the session
    Quit,
}

/// Key help shown by `h` and at session start.
pub const KEY_HELP: &str = "\
Keys (type, then press Enter):
  <Enter>, space   start / pause / resume
  r                reset the current phase
  n, s             skip to the next phase
  w <minutes>      set the work duration
  b <minutes>      set the break duration
  h, ?             show this help
  q                quit";

/// Maps one input line to an action.
///
/// Returns `None` for lines that match no binding.
pub fn parse_line(line: &str) -> Option<SessionAction> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Some(SessionAction::Command(Command::Toggle));
    }

    let line = line.trim();
    let (key, rest) = match line.split_once(char::is_whitespace) {
        Some((key, rest)) => (key, rest.trim()),
        None => (line, ""),
    };

    let action = match key.to_ascii_lowercase().as_str() {
        "p" | "start" | "pause" | "resume" | "toggle" => SessionAction::Command(Command::Toggle),
        "r" | "reset" => SessionAction::Command(Command::Reset),
        "n" | "s" | "next" | "skip" => SessionAction::Command(Command::Skip),
        "w" | "work" if !rest.is_empty() => SessionAction::SetWork(rest.to_string()),
        "b" | "break" if !rest.is_empty() => SessionAction::SetBreak(rest.to_string()),
        "h" | "?" | "help" => SessionAction::Help,
        "q" | "quit" | "exit" => SessionAction::Quit,
        _ => return None,
    };
    Some(action)
}
