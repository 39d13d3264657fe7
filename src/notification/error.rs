//! Notification system error types.
//!
//! A missing permission is an expected condition, not a failure; the
//! controller checks `is_authorized` first and never sees
//! `PermissionDenied` in normal operation.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Notifications have not been authorized.
    #[error("notifications are not permitted")]
    PermissionDenied,

    /// The notification service rejected or failed the request.
    #[error("failed to send notification: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}
