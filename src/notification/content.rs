//! Notification content construction.

use crate::settings::Configuration;
use crate::types::{Phase, StatusMessage};

/// Application name shown by the notification service.
pub const APP_NAME: &str = "Pomodoro";

/// Text of a single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

/// Creates the content announcing that `phase` has begun.
pub fn phase_started_content(phase: Phase, config: &Configuration) -> NotificationContent {
    NotificationContent {
        title: format!("{} - {}", APP_NAME, phase.label()),
        body: format!(
            "{} ({} min)",
            StatusMessage::PhaseStarted(phase).text(),
            config.minutes_for(phase)
        ),
    }
}
