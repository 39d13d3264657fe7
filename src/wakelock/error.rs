//! Wake lock error types.
//!
//! Every wake lock failure is recoverable: the countdown keeps running
//! whether or not the screen is kept awake.

use thiserror::Error;

/// Errors that can occur while holding the display awake.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WakeLockError {
    /// No inhibitor program exists for this platform.
    #[error("Keeping the display awake is not supported on this platform")]
    Unsupported,

    /// The inhibitor program could not be started.
    #[error("Failed to start '{0}': {1}")]
    SpawnFailed(String, String),

    /// The running inhibitor could not be stopped.
    #[error("Failed to stop the wake lock: {0}")]
    ReleaseFailed(String),
}

impl WakeLockError {
    /// Returns true if the platform has no way to hold a wake lock.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }

    /// Returns true if the timer should carry on after this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WakeLockError::SpawnFailed("caffeinate".to_string(), "not found".to_string());
        assert!(err.to_string().contains("caffeinate"));
        assert!(err.to_string().contains("not found"));

        let err = WakeLockError::ReleaseFailed("no such process".to_string());
        assert!(err.to_string().contains("no such process"));
    }

    #[test]
    fn test_error_classification() {
        assert!(WakeLockError::Unsupported.is_unsupported());
        assert!(!WakeLockError::ReleaseFailed(String::new()).is_unsupported());
        assert!(WakeLockError::Unsupported.is_recoverable());
        assert!(WakeLockError::SpawnFailed(String::new(), String::new()).is_recoverable());
    }
}
