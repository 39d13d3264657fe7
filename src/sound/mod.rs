//! Sound playback for the phase-change alert.
//!
//! This module provides:
//!
//! - Sound file discovery and resolution
//! - A synthesized built-in chime
//! - Non-blocking audio playback through rodio
//! - A terminal-bell fallback and the `Alerter` that chains the two
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │     Alerter      │ ← used by the controller
//! └────────┬─────────┘
//!          │ primary            fallback (on failure)
//!          ▼                         ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ RodioSoundPlayer │     │    BellPlayer    │
//! │  file → chime    │     │  ASCII BEL       │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pomodoro_cycle::sound::{get_default_sound, Alerter, BellPlayer, try_create_player, SoundPlayer};
//!
//! let primary = try_create_player().map(|p| p as Arc<dyn SoundPlayer>);
//! let alerter = Alerter::new(primary, Arc::new(BellPlayer::new()), get_default_sound());
//! alerter.alert();
//! ```

mod embedded;
mod error;
mod player;
mod source;

use std::sync::Arc;

use tracing::{debug, warn};

pub use embedded::{chime_tone, CHIME_TONES};
pub use error::SoundError;
pub use player::{try_create_player, BellPlayer, RodioSoundPlayer};
pub use source::{
    discover_system_sounds, find_system_sound, get_default_sound, resolve_sound, SoundSource,
    EMBEDDED_SOUND_NAME,
};

/// Trait for sound playback implementations.
///
/// This trait abstracts the sound playback functionality, allowing for
/// different implementations (e.g., rodio-based, mock for testing).
pub trait SoundPlayer {
    /// Plays a sound from the given source.
    ///
    /// This method should be non-blocking; the sound plays in the background.
    ///
    /// # Errors
    ///
    /// Returns an error if playback fails.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }
}

impl SoundPlayer for BellPlayer {
    fn play(&self, _source: &SoundSource) -> Result<(), SoundError> {
        self.ring(&mut std::io::stderr())
    }
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    play_calls: std::sync::Mutex<Vec<SoundSource>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose every `play` call fails.
    #[must_use]
    pub fn failing() -> Self {
        let player = Self::new();
        player.set_should_fail(true);
        player
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of successful plays.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(source.clone());
        Ok(())
    }
}

// ============================================================================
// Alerter
// ============================================================================

/// Which mechanism, if any, delivered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertOutcome {
    /// The primary player succeeded
    Primary,
    /// The primary was missing or failed; the fallback succeeded
    Fallback,
    /// Both failed; nothing was heard
    Silent,
}

/// Best-effort phase-change alert.
///
/// Tries the primary player, then the fallback. A fallback failure is
/// swallowed: the alert never reports an error to its caller.
pub struct Alerter {
    primary: Option<Arc<dyn SoundPlayer>>,
    fallback: Arc<dyn SoundPlayer>,
    source: SoundSource,
}

impl Alerter {
    /// Creates an alerter; `primary` is `None` when no audio device exists.
    pub fn new(
        primary: Option<Arc<dyn SoundPlayer>>,
        fallback: Arc<dyn SoundPlayer>,
        source: SoundSource,
    ) -> Self {
        Self {
            primary,
            fallback,
            source,
        }
    }

    /// Returns the sound the primary player is asked to play.
    pub fn source(&self) -> &SoundSource {
        &self.source
    }

    /// Plays the alert.
    pub fn alert(&self) -> AlertOutcome {
        if let Some(primary) = &self.primary {
            match primary.play(&self.source) {
                Ok(()) => return AlertOutcome::Primary,
                Err(e) => warn!("Alert sound failed, using fallback: {}", e),
            }
        }

        match self.fallback.play(&self.source) {
            Ok(()) => AlertOutcome::Fallback,
            Err(e) => {
                debug!("Fallback alert failed: {}", e);
                AlertOutcome::Silent
            }
        }
    }
}

impl std::fmt::Debug for Alerter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alerter")
            .field("has_primary", &self.primary.is_some())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alerter(
        primary: Option<Arc<MockSoundPlayer>>,
        fallback: Arc<MockSoundPlayer>,
    ) -> Alerter {
        Alerter::new(
            primary.map(|p| p as Arc<dyn SoundPlayer>),
            fallback,
            SoundSource::embedded("chime"),
        )
    }

    mod alerter_tests {
        use super::*;

        #[test]
        fn test_primary_success() {
            let primary = Arc::new(MockSoundPlayer::new());
            let fallback = Arc::new(MockSoundPlayer::new());
            let alerter = alerter(Some(primary.clone()), fallback.clone());

            assert_eq!(alerter.alert(), AlertOutcome::Primary);
            assert_eq!(primary.play_count(), 1);
            assert_eq!(fallback.play_count(), 0);
        }

        #[test]
        fn test_primary_failure_uses_fallback() {
            let primary = Arc::new(MockSoundPlayer::failing());
            let fallback = Arc::new(MockSoundPlayer::new());
            let alerter = alerter(Some(primary), fallback.clone());

            assert_eq!(alerter.alert(), AlertOutcome::Fallback);
            assert_eq!(fallback.play_count(), 1);
        }

        #[test]
        fn test_missing_primary_uses_fallback() {
            let fallback = Arc::new(MockSoundPlayer::new());
            let alerter = alerter(None, fallback.clone());

            assert_eq!(alerter.alert(), AlertOutcome::Fallback);
            assert_eq!(fallback.play_count(), 1);
        }

        #[test]
        fn test_both_failing_is_silent() {
            let alerter = alerter(
                Some(Arc::new(MockSoundPlayer::failing())),
                Arc::new(MockSoundPlayer::failing()),
            );
            assert_eq!(alerter.alert(), AlertOutcome::Silent);
        }

        #[test]
        fn test_source_passed_to_player() {
            let primary = Arc::new(MockSoundPlayer::new());
            let alerter = Alerter::new(
                Some(primary.clone() as Arc<dyn SoundPlayer>),
                Arc::new(MockSoundPlayer::new()),
                SoundSource::file("end", "/tmp/end.mp3"),
            );
            alerter.alert();
            assert_eq!(
                primary.get_play_calls(),
                vec![SoundSource::file("end", "/tmp/end.mp3")]
            );
        }
    }

    mod mock_player_tests {
        use super::*;

        #[test]
        fn test_mock_records_and_clears_calls() {
            let player = MockSoundPlayer::new();
            player.play(&SoundSource::embedded("chime")).unwrap();
            assert_eq!(player.play_count(), 1);

            player.set_should_fail(true);
            assert!(player.play(&SoundSource::embedded("chime")).is_err());
            assert_eq!(player.play_count(), 1);

            player.clear_calls();
            assert_eq!(player.play_count(), 0);
        }
    }
}
