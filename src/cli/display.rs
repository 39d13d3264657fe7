//! Display utilities for the pomodoro-cycle CLI.
//!
//! This module provides:
//! - `TerminalDisplay`: the live status line of an interactive session
//! - `Display`: one-shot output for the `config` subcommands and errors

use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;

use crate::engine::DisplaySurface;
use crate::settings::{Configuration, DurationSettings};
use crate::types::{Controls, Phase};

/// Clears the current terminal line and returns the cursor to column 0.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// TerminalDisplay
// ============================================================================

#[derive(Debug)]
struct LineState<W> {
    writer: W,
    readout: String,
    phase: Phase,
    message: String,
    controls: Option<Controls>,
}

/// A single redrawn status line:
///
/// ```text
/// Work  24:59  Time to focus!   [Enter] Pause  [r] Reset  [n] Skip
/// ```
#[derive(Debug)]
pub struct TerminalDisplay<W: Write> {
    line: Mutex<LineState<W>>,
}

impl TerminalDisplay<std::io::Stdout> {
    /// Creates a display writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(writer: W) -> Self {
        Self {
            line: Mutex::new(LineState {
                writer,
                readout: String::new(),
                phase: Phase::default(),
                message: String::new(),
                controls: None,
            }),
        }
    }

    /// Prints `text` above the status line, then redraws the status line.
    pub fn print_block(&self, text: &str) {
        self.with_line(|line| {
            writeln!(line.writer, "{}{}", CLEAR_LINE, text)?;
            Self::draw(line)
        });
    }

    /// Ends the status line so the shell prompt starts on a fresh line.
    pub fn finish(&self) {
        self.with_line(|line| {
            writeln!(line.writer)?;
            line.writer.flush()
        });
    }

    /// Consumes the display and returns its writer.
    pub fn into_inner(self) -> W {
        match self.line.into_inner() {
            Ok(line) => line.writer,
            Err(poisoned) => poisoned.into_inner().writer,
        }
    }

    fn with_line(&self, f: impl FnOnce(&mut LineState<W>) -> std::io::Result<()>) {
        let mut line = match self.line.lock() {
            Ok(line) => line,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = f(&mut line) {
            debug!("Terminal write failed: {}", e);
        }
    }

    fn draw(line: &mut LineState<W>) -> std::io::Result<()> {
        write!(
            line.writer,
            "{}{:<5} {}",
            CLEAR_LINE,
            line.phase.label(),
            line.readout
        )?;
        if !line.message.is_empty() {
            write!(line.writer, "  {}", line.message)?;
        }
        if let Some(controls) = &line.controls {
            write!(line.writer, "   {}", control_hint(controls))?;
        }
        line.writer.flush()
    }
}

impl<W: Write> DisplaySurface for TerminalDisplay<W> {
    fn render_time(&self, readout: &str, phase: Phase) {
        self.with_line(|line| {
            line.readout = readout.to_string();
            line.phase = phase;
            Self::draw(line)
        });
    }

    fn show_message(&self, message: &str) {
        self.with_line(|line| {
            line.message = message.to_string();
            Self::draw(line)
        });
    }

    fn set_controls(&self, controls: &Controls) {
        self.with_line(|line| {
            if line.controls.as_ref() == Some(controls) {
                return Ok(());
            }
            line.controls = Some(*controls);
            Self::draw(line)
        });
    }
}

/// Key hints for the enabled affordances.
fn control_hint(controls: &Controls) -> String {
    let mut hint = format!("[Enter] {}", controls.toggle.as_str());
    if controls.reset_enabled {
        hint.push_str("  [r] Reset");
    }
    if controls.skip_enabled {
        hint.push_str("  [n] Skip");
    }
    hint
}

// ============================================================================
// Display
// ============================================================================

/// One-shot CLI output.
pub struct Display;

impl Display {
    /// Shows the stored durations and what they resolve to.
    pub fn show_config(settings: &DurationSettings, store_path: Option<&Path>) {
        print!("{}", Self::format_config(settings, store_path));
    }

    /// Shows a confirmation after `config set` or `config reset`.
    pub fn show_config_saved(settings: &DurationSettings) {
        let config = settings.resolve();
        println!(
            "Saved: work {} min, break {} min",
            config.work_minutes, config.break_minutes
        );
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    fn format_config(settings: &DurationSettings, store_path: Option<&Path>) -> String {
        let config = Configuration::from(settings);
        let mut out = String::new();
        out.push_str(&Self::config_line("Work", &settings.work, config.work_minutes));
        out.push_str(&Self::config_line(
            "Break",
            &settings.break_time,
            config.break_minutes,
        ));
        if let Some(path) = store_path {
            out.push_str(&format!("Stored in: {}\n", path.display()));
        }
        out
    }

    fn config_line(label: &str, raw: &str, minutes: u32) -> String {
        if raw.trim() == minutes.to_string() {
            format!("{:<6} {} min\n", format!("{}:", label), minutes)
        } else {
            format!(
                "{:<6} {} min (stored {:?})\n",
                format!("{}:", label),
                minutes,
                raw
            )
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
