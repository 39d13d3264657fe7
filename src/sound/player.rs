//! Sound player implementations.
//!
//! `RodioSoundPlayer` plays files and the built-in chime through rodio;
//! `BellPlayer` rings the terminal bell and serves as the fallback alert.

use std::fs::File;
use std::io::{BufReader, Write};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::embedded::{chime_tone, CHIME_TONES};
use super::error::SoundError;
use super::source::SoundSource;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking; sounds continue playing in the background.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
}

impl RodioSoundPlayer {
    /// Creates a new sound player.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
        })
    }

    /// Plays a sound from the given source.
    ///
    /// A sound file that cannot be played falls back to the built-in chime.
    ///
    /// # Errors
    ///
    /// Returns an error if neither the file nor the chime could be played.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::File { path, name } => {
                debug!("Playing sound file: {}", name);
                match self.play_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        warn!(
                            "Failed to play sound '{}': {}, falling back to chime",
                            name, e
                        );
                        self.play_chime()
                    }
                }
            }
            SoundSource::Embedded { name } => {
                debug!("Playing embedded sound: {}", name);
                self.play_chime()
            }
        }
    }

    fn play_file(&self, path: &std::path::Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        sink.detach();
        Ok(())
    }

    fn play_chime(&self) -> Result<(), SoundError> {
        let sink = self.new_sink()?;
        for (frequency, millis) in CHIME_TONES {
            sink.append(chime_tone(*frequency, *millis));
        }
        // Non-blocking: sound continues after function returns
        sink.detach();
        debug!("Chime playback started (detached)");
        Ok(())
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer").finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, using terminal bell: {}", e);
            None
        }
    }
}

// ============================================================================
// BellPlayer
// ============================================================================

/// Rings the terminal bell regardless of the requested source.
#[derive(Debug, Default)]
pub struct BellPlayer;

impl BellPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the bell character to `out`.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::PlaybackError` if the write fails.
    pub fn ring(&self, out: &mut impl Write) -> Result<(), SoundError> {
        out.write_all(b"\x07")
            .and_then(|()| out.flush())
            .map_err(|e| SoundError::PlaybackError(format!("terminal bell: {}", e)))
    }
}
