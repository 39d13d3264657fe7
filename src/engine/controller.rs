//! The timer controller.
//!
//! `Controller` owns the single `TimerState` and every collaborator the
//! state machine talks to. Each input is resolved against the settings as
//! they are at that moment, fed through [`step`], and the resulting effects
//! are applied in order. Effects are best-effort: nothing a capability
//! reports can stop the countdown.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::clock::Clock;
use super::machine::{step, Effect};
use super::scheduler::Scheduler;
use super::surface::DisplaySurface;
use crate::notification::{phase_started_content, NotificationSender};
use crate::settings::{load_durations, save_durations, Configuration, DurationSettings, SettingsStore};
use crate::sound::Alerter;
use crate::types::{format_remaining, Input, Phase, TimerState};
use crate::wakelock::WakeLock;

// ============================================================================
// Capabilities
// ============================================================================

/// The best-effort side channels used on phase changes.
pub struct Capabilities {
    /// Audible alert with its fallback
    pub alerter: Alerter,
    /// System notifications
    pub notifier: Arc<dyn NotificationSender>,
    /// Screen wake lock
    pub wake_lock: Arc<dyn WakeLock>,
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("alerter", &self.alerter)
            .field("notifications_authorized", &self.notifier.is_authorized())
            .field("wake_lock_held", &self.wake_lock.is_held())
            .finish()
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Drives the timer state machine.
pub struct Controller<C: Clock, S: Scheduler> {
    state: TimerState,
    settings: DurationSettings,
    store: Arc<dyn SettingsStore>,
    clock: C,
    scheduler: S,
    display: Arc<dyn DisplaySurface>,
    capabilities: Capabilities,
}

impl<C: Clock, S: Scheduler> Controller<C, S> {
    /// Creates a controller in `Idle/Work`, loading durations from `store`.
    pub fn new(
        store: Arc<dyn SettingsStore>,
        clock: C,
        scheduler: S,
        display: Arc<dyn DisplaySurface>,
        capabilities: Capabilities,
    ) -> Self {
        let settings = load_durations(store.as_ref());
        debug!(
            "Loaded durations: work={:?} break={:?}",
            settings.work, settings.break_time
        );
        Self {
            state: TimerState::default(),
            settings,
            store,
            clock,
            scheduler,
            display,
            capabilities,
        }
    }

    /// Shows the full duration of the current phase without starting it.
    pub fn initialize(&mut self) {
        let config = self.settings.resolve();
        self.render(config.duration_for(self.state.phase), self.state.phase);
        self.display.set_controls(&self.state.controls());
    }

    /// Feeds one input to the state machine and applies its effects.
    pub fn handle(&mut self, input: Input) {
        let config = self.settings.resolve();
        let now = self.clock.now();
        let transition = step(self.state, input, &config, now);

        if transition.state != self.state && input != Input::Tick {
            debug!(
                "{:?}: {} {} -> {} {}",
                input,
                self.state.phase,
                self.state.run.as_str(),
                transition.state.phase,
                transition.state.run.as_str()
            );
        }
        self.state = transition.state;

        for effect in transition.effects {
            self.apply(effect, &config);
        }
        self.display.set_controls(&self.state.controls());
    }

    /// Replaces the work duration text and persists it.
    pub fn update_work(&mut self, raw: impl Into<String>) {
        self.settings.work = raw.into();
        self.settings_changed(Phase::Work);
    }

    /// Replaces the break duration text and persists it.
    pub fn update_break(&mut self, raw: impl Into<String>) {
        self.settings.break_time = raw.into();
        self.settings_changed(Phase::Break);
    }

    /// Releases everything held on behalf of the countdown.
    pub fn shutdown(&mut self) {
        self.scheduler.stop();
        if let Err(e) = self.capabilities.wake_lock.release() {
            warn!("Failed to release wake lock: {}", e);
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn settings(&self) -> &DurationSettings {
        &self.settings
    }

    /// Returns the durations currently in effect.
    #[must_use]
    pub fn configuration(&self) -> Configuration {
        self.settings.resolve()
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn settings_changed(&mut self, phase: Phase) {
        if let Err(e) = save_durations(self.store.as_ref(), &self.settings) {
            warn!("Failed to save durations: {}", e);
        }

        let config = self.settings.resolve();
        info!("{} duration set to {} min", phase, config.minutes_for(phase));

        // A running or paused countdown keeps the target it was started with.
        if self.state.is_idle() {
            self.render(config.duration_for(self.state.phase), self.state.phase);
        }
    }

    fn apply(&mut self, effect: Effect, config: &Configuration) {
        match effect {
            Effect::Render { remaining, phase } => self.render(remaining, phase),
            Effect::Message(message) => self.display.show_message(message.text()),
            Effect::StartPolling => self.scheduler.start(),
            Effect::StopPolling => self.scheduler.stop(),
            Effect::PlayAlert => {
                let outcome = self.capabilities.alerter.alert();
                debug!("Alert outcome: {:?}", outcome);
            }
            Effect::Notify(phase) => self.notify(phase, config),
            Effect::AcquireWakeLock => {
                if let Err(e) = self.capabilities.wake_lock.acquire() {
                    warn!("Failed to acquire wake lock: {}", e);
                }
            }
            Effect::ReleaseWakeLock => {
                if let Err(e) = self.capabilities.wake_lock.release() {
                    warn!("Failed to release wake lock: {}", e);
                }
            }
        }
    }

    fn notify(&self, phase: Phase, config: &Configuration) {
        let notifier = &self.capabilities.notifier;
        if !notifier.is_authorized() {
            debug!("Notifications not authorized, skipping");
            return;
        }
        let content = phase_started_content(phase, config);
        if let Err(e) = notifier.send(&content) {
            warn!("Failed to send notification: {}", e);
        }
    }

    fn render(&self, remaining: std::time::Duration, phase: Phase) {
        self.display.render_time(&format_remaining(remaining), phase);
    }
}

// ============================================================================
// Tests
// ============================================================================
