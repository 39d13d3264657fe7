//! The display surface the controller writes to.
//!
//! The controller never owns presentation; it only pushes the time
//! readout, the phase label, the status line and the affordance state.

use std::sync::Mutex;

use crate::types::{Controls, Phase};

/// Output side of the host UI.
pub trait DisplaySurface {
    /// Shows the `MM:SS` readout and the phase it belongs to.
    fn render_time(&self, readout: &str, phase: Phase);

    /// Replaces the free-text status line.
    fn show_message(&self, message: &str);

    /// Updates the toggle caption and the Reset/Skip enable state.
    fn set_controls(&self, controls: &Controls);
}

/// Display that records everything pushed to it.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    readouts: Mutex<Vec<(String, Phase)>>,
    messages: Mutex<Vec<String>>,
    controls: Mutex<Vec<Controls>>,
}

impl RecordingDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recent readout.
    #[must_use]
    pub fn last_readout(&self) -> Option<String> {
        self.readouts.lock().unwrap().last().map(|(r, _)| r.clone())
    }

    /// Returns the phase of the most recent readout.
    #[must_use]
    pub fn last_phase(&self) -> Option<Phase> {
        self.readouts.lock().unwrap().last().map(|(_, p)| *p)
    }

    #[must_use]
    pub fn readouts(&self) -> Vec<(String, Phase)> {
        self.readouts.lock().unwrap().clone()
    }

    #[must_use]
    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().unwrap().last().cloned()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    #[must_use]
    pub fn last_controls(&self) -> Option<Controls> {
        self.controls.lock().unwrap().last().copied()
    }

    pub fn clear(&self) {
        self.readouts.lock().unwrap().clear();
        self.messages.lock().unwrap().clear();
        self.controls.lock().unwrap().clear();
    }
}

impl DisplaySurface for RecordingDisplay {
    fn render_time(&self, readout: &str, phase: Phase) {
        self.readouts
            .lock()
            .unwrap()
            .push((readout.to_string(), phase));
    }

    fn show_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn set_controls(&self, controls: &Controls) {
        self.controls.lock().unwrap().push(*controls);
    }
}
