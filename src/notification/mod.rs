//! Desktop notifications for phase changes.
//!
//! This module provides:
//!
//! - A `Permission` gate: notifications are only sent once granted
//! - `DesktopNotifier`, backed by notify-rust
//! - `MockNotificationSender` for tests
//!
//! Delivery is fire-and-forget. When a tokio runtime is available the
//! platform call runs on the blocking pool, so a slow notification daemon
//! can never stall the tick loop.
//!
//! # Example
//!
//! ```rust,no_run
//! use pomodoro_cycle::notification::{DesktopNotifier, NotificationSender, Permission};
//! use pomodoro_cycle::notification::phase_started_content;
//! use pomodoro_cycle::settings::Configuration;
//! use pomodoro_cycle::types::Phase;
//!
//! let notifier = DesktopNotifier::new(Permission::Granted);
//! if notifier.is_authorized() {
//!     let content = phase_started_content(Phase::Break, &Configuration::default());
//!     let _ = notifier.send(&content);
//! }
//! ```

mod content;
pub mod error;

use tracing::{debug, warn};

pub use self::content::{phase_started_content, NotificationContent, APP_NAME};
pub use self::error::NotificationError;

// ============================================================================
// Permission
// ============================================================================

/// Whether the host may show notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    /// The user allowed notifications
    Granted,
    /// The user refused notifications
    Denied,
    /// Never asked
    #[default]
    Default,
}

impl Permission {
    /// Returns true only for `Granted`.
    #[must_use]
    pub fn is_granted(self) -> bool {
        self == Permission::Granted
    }
}

// ============================================================================
// NotificationSender
// ============================================================================

/// Sends system notifications.
pub trait NotificationSender {
    /// Returns true if notifications have been authorized.
    fn is_authorized(&self) -> bool;

    /// Sends a notification.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` if not authorized, or `SendFailed` if the
    /// platform rejected the request synchronously.
    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError>;
}

/// Notification sender backed by the platform notification service.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    permission: Permission,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }

    #[must_use]
    pub fn permission(&self) -> Permission {
        self.permission
    }
}

fn show(content: &NotificationContent) -> Result<(), NotificationError> {
    notify_rust::Notification::new()
        .appname(APP_NAME)
        .summary(&content.title)
        .body(&content.body)
        .show()
        .map(|_| ())
        .map_err(|e| NotificationError::SendFailed(e.to_string()))
}

impl NotificationSender for DesktopNotifier {
    fn is_authorized(&self) -> bool {
        self.permission.is_granted()
    }

    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if !self.is_authorized() {
            return Err(NotificationError::PermissionDenied);
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let content = content.clone();
                handle.spawn_blocking(move || {
                    if let Err(e) = show(&content) {
                        warn!("Notification not delivered: {}", e);
                    }
                });
                debug!("Notification queued");
                Ok(())
            }
            Err(_) => show(content),
        }
    }
}

// ============================================================================
// MockNotificationSender
// ============================================================================

/// Mock notification sender for testing.
#[derive(Debug, Default)]
pub struct MockNotificationSender {
    permission: std::sync::Mutex<Permission>,
    sent: std::sync::Mutex<Vec<NotificationContent>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockNotificationSender {
    #[must_use]
    pub fn new(permission: Permission) -> Self {
        Self {
            permission: std::sync::Mutex::new(permission),
            ..Self::default()
        }
    }

    pub fn set_permission(&self, permission: Permission) {
        *self.permission.lock().unwrap() = permission;
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn sent(&self) -> Vec<NotificationContent> {
        self.sent.lock().unwrap().clone()
    }

    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl NotificationSender for MockNotificationSender {
    fn is_authorized(&self) -> bool {
        self.permission.lock().unwrap().is_granted()
    }

    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if !self.is_authorized() {
            return Err(NotificationError::PermissionDenied);
        }
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.sent.lock().unwrap().push(content.clone());
        Ok(())
    }
}
