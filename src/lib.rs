//! Pomodoro Cycle Library
//!
//! This library provides the core of a Pomodoro interval timer that
//! alternates Work and Break phases. It includes:
//! - The timer state machine and the controller that drives it
//! - Duration settings with lenient parsing and JSON persistence
//! - A best-effort phase-change alert (audio with a terminal-bell fallback)
//! - Desktop notifications gated by a permission
//! - An optional screen wake lock
//! - The terminal host: CLI parsing, key bindings and the session loop

pub mod cli;
pub mod engine;
pub mod notification;
pub mod settings;
pub mod sound;
pub mod types;
pub mod wakelock;

// Re-export commonly used types for convenience
pub use types::{
    format_remaining, Command, Controls, Input, Phase, RunState, StatusMessage, TimerState,
    ToggleLabel,
};

// Re-export engine types
pub use engine::{
    step, Capabilities, Clock, Controller, DisplaySurface, Effect, IntervalScheduler,
    ManualClock, ManualScheduler, RecordingDisplay, Scheduler, SystemClock, Transition,
};

// Re-export settings types
pub use settings::{
    load_durations, parse_minutes, save_durations, Configuration, DurationSettings,
    JsonFileStore, MemoryStore, SettingsError, SettingsStore,
};

// Re-export sound types
pub use sound::{
    get_default_sound, resolve_sound, AlertOutcome, Alerter, BellPlayer, MockSoundPlayer,
    RodioSoundPlayer, SoundError, SoundPlayer, SoundSource,
};

// Re-export notification types
pub use notification::{
    DesktopNotifier, MockNotificationSender, NotificationContent, NotificationError,
    NotificationSender, Permission,
};

// Re-export wake lock types
pub use wakelock::{InhibitorWakeLock, MockWakeLock, NoopWakeLock, WakeLock, WakeLockError};
