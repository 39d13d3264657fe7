//! Settings store error types.
//!
//! None of these errors ever reach the user: loading falls back to the
//! default durations, and a failed save is logged and otherwise ignored.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No per-user configuration directory could be determined.
    #[error("could not determine a configuration directory")]
    NoConfigDir,

    /// Reading or writing the backing file failed.
    #[error("settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SettingsError {
    /// Returns true if the stored data exists but could not be understood.
    #[must_use]
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}
