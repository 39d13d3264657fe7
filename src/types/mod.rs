//! Core data types for the Pomodoro Cycle timer.
//!
//! This module defines the data structures used for:
//! - Phase and run-state modelling
//! - Commands and inputs accepted by the state machine
//! - Display-facing values (controls, status messages, time readout)

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

// ============================================================================
// Phase
// ============================================================================

/// One of the two alternating intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Focused work interval
    #[default]
    Work,
    /// Rest interval
    Break,
}

impl Phase {
    /// Returns the phase that follows this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    /// Returns the human-readable label shown next to the readout.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// RunState
// ============================================================================

/// Whether the countdown is idle, running or paused.
///
/// Each variant carries exactly the data that is meaningful in it, so a
/// paused remainder can never coexist with a running target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Not started, or reset
    #[default]
    Idle,
    /// Counting down towards `target`
    Running {
        /// Absolute instant at which the countdown reaches zero
        target: Instant,
    },
    /// Holding a frozen remainder
    Paused {
        /// Time left when the countdown was paused
        remaining: Duration,
    },
}

impl RunState {
    /// Returns the string representation of the run-state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Running { .. } => "running",
            RunState::Paused { .. } => "paused",
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The single authoritative timer value, owned by the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    /// Active phase
    pub phase: Phase,
    /// Run-state of the countdown
    pub run: RunState,
}

impl TimerState {
    /// Creates the initial state: idle, in the work phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the timer is actively counting down.
    pub fn is_running(&self) -> bool {
        matches!(self.run, RunState::Running { .. })
    }

    /// Returns true if the timer holds a paused remainder.
    pub fn is_paused(&self) -> bool {
        matches!(self.run, RunState::Paused { .. })
    }

    /// Returns true if neither running nor paused.
    pub fn is_idle(&self) -> bool {
        self.run == RunState::Idle
    }

    /// Returns the time left at `now`, or `None` while idle.
    pub fn remaining_at(&self, now: Instant) -> Option<Duration> {
        match self.run {
            RunState::Idle => None,
            RunState::Running { target } => Some(target.saturating_duration_since(now)),
            RunState::Paused { remaining } => Some(remaining),
        }
    }

    /// Returns the state of the display affordances for this state.
    pub fn controls(&self) -> Controls {
        let toggle = match self.run {
            RunState::Idle => ToggleLabel::Start,
            RunState::Running { .. } => ToggleLabel::Pause,
            RunState::Paused { .. } => ToggleLabel::Resume,
        };
        let active = !self.is_idle();
        Controls {
            toggle,
            reset_enabled: active,
            skip_enabled: active,
        }
    }
}

// ============================================================================
// Commands and inputs
// ============================================================================

/// Discrete user commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start, pause or resume depending on the run-state
    Toggle,
    /// Start the current phase from idle
    Start,
    /// Freeze the running countdown
    Pause,
    /// Continue a paused countdown
    Resume,
    /// Return to idle, keeping the phase
    Reset,
    /// Force the phase transition now
    Skip,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Toggle => "toggle",
            Command::Start => "start",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Reset => "reset",
            Command::Skip => "skip",
        };
        f.write_str(name)
    }
}

/// Everything the state machine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A user command
    Command(Command),
    /// A polling tick
    Tick,
}

impl From<Command> for Input {
    fn from(command: Command) -> Self {
        Input::Command(command)
    }
}

// ============================================================================
// Display-facing values
// ============================================================================

/// Caption of the single start/pause/resume affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleLabel {
    Start,
    Pause,
    Resume,
}

impl ToggleLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleLabel::Start => "Start",
            ToggleLabel::Pause => "Pause",
            ToggleLabel::Resume => "Resume",
        }
    }
}

/// Enable/disable state of the display affordances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Caption of the toggle affordance
    pub toggle: ToggleLabel,
    /// Whether Reset is enabled
    pub reset_enabled: bool,
    /// Whether Skip is enabled
    pub skip_enabled: bool,
}

/// Free-text status line contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    /// A new phase has begun
    PhaseStarted(Phase),
    Paused,
    Resumed,
    Reset,
}

impl StatusMessage {
    /// Returns the text shown on the status line.
    pub fn text(&self) -> &'static str {
        match self {
            StatusMessage::PhaseStarted(Phase::Work) => "Time to focus!",
            StatusMessage::PhaseStarted(Phase::Break) => "Time for a break!",
            StatusMessage::Paused => "Timer paused",
            StatusMessage::Resumed => "Timer resumed",
            StatusMessage::Reset => "Timer reset",
        }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Formats a remaining duration as `MM:SS`.
///
/// Seconds are rounded up, so `00:00` only appears once no time is left.
pub fn format_remaining(remaining: Duration) -> String {
    let millis = remaining.as_millis();
    let total_seconds = millis.div_ceil(1000);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ============================================================================
// Tests
// ============================================================================
