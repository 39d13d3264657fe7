//! Duration settings and their persistence.
//!
//! The two durations are kept as the raw text the user typed, stored as a
//! single `{"work": "...", "break": "..."}` record, and resolved to whole
//! minutes only when a countdown starts. Anything that cannot be resolved
//! falls back to the defaults; no failure here is ever shown to the user.

mod error;
mod store;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::Phase;

pub use error::SettingsError;
pub use store::{JsonFileStore, MemoryStore, SettingsStore};

/// Key under which the durations record is stored.
pub const STORAGE_KEY: &str = "pomodoro-durations";

/// Default work duration in minutes.
pub const DEFAULT_WORK_MINUTES: u32 = 25;

/// Default break duration in minutes.
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

// ============================================================================
// DurationSettings
// ============================================================================

/// The persisted durations record, as raw minute text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSettings {
    /// Work duration text
    #[serde(default)]
    pub work: String,
    /// Break duration text
    #[serde(rename = "break", default)]
    pub break_time: String,
}

impl Default for DurationSettings {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_MINUTES.to_string(),
            break_time: DEFAULT_BREAK_MINUTES.to_string(),
        }
    }
}

impl DurationSettings {
    /// Creates settings from raw text values.
    pub fn new(work: impl Into<String>, break_time: impl Into<String>) -> Self {
        Self {
            work: work.into(),
            break_time: break_time.into(),
        }
    }

    /// Replaces the work duration text.
    pub fn with_work(mut self, work: impl Into<String>) -> Self {
        self.work = work.into();
        self
    }

    /// Replaces the break duration text.
    pub fn with_break(mut self, break_time: impl Into<String>) -> Self {
        self.break_time = break_time.into();
        self
    }

    /// Resolves the raw text into whole minutes, substituting defaults.
    pub fn resolve(&self) -> Configuration {
        Configuration::from(self)
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Resolved, always-positive phase durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    /// Work duration in minutes
    pub work_minutes: u32,
    /// Break duration in minutes
    pub break_minutes: u32,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

impl Configuration {
    /// Returns the configured minutes for `phase`.
    pub fn minutes_for(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_minutes,
            Phase::Break => self.break_minutes,
        }
    }

    /// Returns the full countdown length for `phase`.
    pub fn duration_for(&self, phase: Phase) -> Duration {
        Duration::from_secs(u64::from(self.minutes_for(phase)) * 60)
    }
}

impl From<&DurationSettings> for Configuration {
    fn from(settings: &DurationSettings) -> Self {
        Self {
            work_minutes: parse_minutes(&settings.work).unwrap_or(DEFAULT_WORK_MINUTES),
            break_minutes: parse_minutes(&settings.break_time).unwrap_or(DEFAULT_BREAK_MINUTES),
        }
    }
}

/// Parses a minute count the way a lenient numeric input field does.
///
/// Leading and trailing whitespace is ignored and an optional `+` sign is
/// accepted; digits are read up to the first non-digit (`"12abc"` is 12,
/// `"7.5"` is 7). Returns `None` for empty, non-numeric, negative, zero or
/// overflowing input.
pub fn parse_minutes(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let minutes: u32 = unsigned[..digits_len].parse().ok()?;
    (minutes > 0).then_some(minutes)
}

// ============================================================================
// Load / Save
// ============================================================================

/// Loads the durations record, falling back to defaults.
///
/// An absent key, an unreadable store or a malformed record all yield the
/// defaults. A stored field that is empty keeps its default value.
pub fn load_durations(store: &dyn SettingsStore) -> DurationSettings {
    let raw = match store.get(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored durations, using defaults");
            return DurationSettings::default();
        }
        Err(e) => {
            warn!("Could not read stored durations, using defaults: {}", e);
            return DurationSettings::default();
        }
    };

    let stored: DurationSettings = match serde_json::from_str(&raw) {
        Ok(stored) => stored,
        Err(e) => {
            debug!("Ignoring malformed stored durations: {}", e);
            return DurationSettings::default();
        }
    };

    let mut settings = DurationSettings::default();
    if !stored.work.is_empty() {
        settings.work = stored.work;
    }
    if !stored.break_time.is_empty() {
        settings.break_time = stored.break_time;
    }
    settings
}

/// Persists the durations record.
///
/// # Errors
///
/// Returns an error if the record cannot be encoded or the store rejects it.
pub fn save_durations(
    store: &dyn SettingsStore,
    settings: &DurationSettings,
) -> Result<(), SettingsError> {
    let json = serde_json::to_string(settings)?;
    store.set(STORAGE_KEY, &json)
}

// ============================================================================
// Tests
// ============================================================================
