//! Sound source management.
//!
//! An alert is either a sound file (a user-supplied path or a sound found
//! in the platform sound directories) or the built-in chime.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sound file on disk.
    File {
        /// The name of the sound (e.g., "complete").
        name: String,
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// The built-in chime.
    Embedded {
        /// The name of the embedded sound (e.g., "chime").
        name: String,
    },
}

impl SoundSource {
    /// Creates a new file sound source.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::File {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a new embedded sound source.
    #[must_use]
    pub fn embedded(name: impl Into<String>) -> Self {
        Self::Embedded { name: name.into() }
    }

    /// Returns the name of the sound source.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::File { name, .. } | Self::Embedded { name } => name,
        }
    }

    /// Returns true if this is a sound file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns true if this is the built-in chime.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded { .. })
    }

    /// Returns the file path if this is a sound file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Embedded { .. } => None,
        }
    }
}

/// Directories to search for platform sounds, in order of priority.
const SYSTEM_SOUND_DIRS: &[&str] = &[
    "/System/Library/Sounds",
    "/Library/Sounds",
    "/usr/share/sounds/freedesktop/stereo",
];

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "oga"];

/// Default sound names to try, in order of preference.
const DEFAULT_SOUND_NAMES: &[&str] = &["complete", "bell", "Glass", "Ping"];

/// Name of the built-in chime.
pub const EMBEDDED_SOUND_NAME: &str = "chime";

fn sounds_in(dir: &Path) -> Vec<SoundSource> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut sounds = Vec::new();
    for entry in entries.flatten() {
        let file_path = entry.path();
        let supported = file_path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
        if !supported {
            continue;
        }
        if let Some(stem) = file_path.file_stem() {
            sounds.push(SoundSource::File {
                name: stem.to_string_lossy().into_owned(),
                path: file_path,
            });
        }
    }
    sounds
}

/// Discovers available platform sounds.
///
/// Returns an empty vector if no sounds are found.
#[must_use]
pub fn discover_system_sounds() -> Vec<SoundSource> {
    let mut sounds: Vec<SoundSource> = SYSTEM_SOUND_DIRS
        .iter()
        .flat_map(|dir| sounds_in(Path::new(dir)))
        .collect();

    // Sort by name for consistent ordering
    sounds.sort_by(|a, b| a.name().cmp(b.name()));
    sounds
}

/// Gets the default alert sound.
///
/// Prefers a known platform sound and falls back to the built-in chime.
#[must_use]
pub fn get_default_sound() -> SoundSource {
    let system_sounds = discover_system_sounds();

    for preferred_name in DEFAULT_SOUND_NAMES {
        if let Some(sound) = system_sounds.iter().find(|s| s.name() == *preferred_name) {
            return sound.clone();
        }
    }

    SoundSource::embedded(EMBEDDED_SOUND_NAME)
}

/// Finds a platform sound by name (case-insensitive).
///
/// # Errors
///
/// Returns `SoundError::FileNotFound` if no sound with the given name exists.
pub fn find_system_sound(name: &str) -> Result<SoundSource, SoundError> {
    discover_system_sounds()
        .into_iter()
        .find(|s| s.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| SoundError::FileNotFound(format!("system sound '{}' not found", name)))
}

/// Resolves a user-supplied sound: an existing file path, a platform sound
/// name, or `chime` for the built-in chime.
///
/// # Errors
///
/// Returns `SoundError::FileNotFound` if `name` matches none of those.
pub fn resolve_sound(name: &str) -> Result<SoundSource, SoundError> {
    if name.eq_ignore_ascii_case(EMBEDDED_SOUND_NAME) {
        return Ok(SoundSource::embedded(EMBEDDED_SOUND_NAME));
    }

    let path = Path::new(name);
    if path.is_file() {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.to_string());
        return Ok(SoundSource::file(stem, path));
    }

    find_system_sound(name)
}
