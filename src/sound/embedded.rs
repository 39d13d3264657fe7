//! Built-in alert chime.
//!
//! Used when no sound file is configured or a file cannot be played. The
//! chime is synthesized, so it needs no bundled asset.

use std::time::Duration;

use rodio::source::SineWave;
use rodio::Source;

/// Tones of the chime as (frequency in Hz, length in ms), played in order.
pub const CHIME_TONES: &[(f32, u64)] = &[(880.0, 140), (1174.7, 140), (1760.0, 260)];

/// Output gain applied to every tone.
pub const CHIME_VOLUME: f32 = 0.25;

/// Returns one tone of the chime as a playable source.
pub fn chime_tone(frequency: f32, millis: u64) -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(frequency)
        .amplify(CHIME_VOLUME)
        .take_duration(Duration::from_millis(millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chime_duration() -> Duration {
        Duration::from_millis(CHIME_TONES.iter().map(|(_, ms)| ms).sum())
    }

    #[test]
    fn test_chime_is_short_and_audible() {
        assert!(!CHIME_TONES.is_empty());
        assert!(chime_duration() < Duration::from_secs(1));
        assert!(CHIME_TONES.iter().all(|(f, _)| (200.0..4000.0).contains(f)));
        assert!(CHIME_VOLUME > 0.0 && CHIME_VOLUME <= 1.0);
    }

    #[test]
    fn test_chime_tone_produces_samples() {
        let mut tone = chime_tone(880.0, 10);
        assert!(tone.next().is_some());
        assert_eq!(tone.channels(), 1);
    }
}
