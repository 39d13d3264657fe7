//! Key-value persistence backends.
//!
//! The timer only ever persists one record, but the store is a plain
//! string key-value interface so the record format stays owned by the
//! settings module.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use super::error::SettingsError;

/// Directory name under the user configuration directory.
const APP_DIR_NAME: &str = "pomodoro-cycle";

/// File holding the key-value document.
const STORAGE_FILE_NAME: &str = "storage.json";

/// A durable string key-value store.
///
/// Each call is atomic from the caller's perspective; there is a single
/// writer, so no further coordination is provided.
pub trait SettingsStore {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

// ============================================================================
// JsonFileStore
// ============================================================================

/// Store backed by a JSON object document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store using the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a store inside `dir` (the file name is fixed).
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(STORAGE_FILE_NAME))
    }

    /// Creates a store in the per-user configuration directory.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::NoConfigDir` if the platform has no such directory.
    pub fn default_location() -> Result<Self, SettingsError> {
        let base = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self::in_dir(base.join(APP_DIR_NAME)))
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;

        // Readers only ever see the old or the new document.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let document = self.read_document()?;
        Ok(document.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut document = match self.read_document() {
            Ok(document) => document,
            Err(e) if e.is_corrupt() => {
                warn!(
                    "Discarding unreadable settings file {}: {}",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)?;
        debug!("Saved settings key '{}' to {}", key, self.path.display());
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    /// Makes subsequent writes fail with an I/O error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| SettingsError::Io(std::io::Error::other(e.to_string())))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SettingsError::Io(std::io::Error::other(
                "simulated write failure",
            )));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| SettingsError::Io(std::io::Error::other(e.to_string())))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod json_file_store_tests {
        use super::*;

        #[test]
        fn test_missing_file_reads_as_empty() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path());
            assert_eq!(store.get("anything").unwrap(), None);
        }

        #[test]
        fn test_set_then_get() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path());

            store.set("k", "v").unwrap();
            assert_eq!(store.get("k").unwrap(), Some("v".to_string()));

            store.set("k", "w").unwrap();
            assert_eq!(store.get("k").unwrap(), Some("w".to_string()));
        }

        #[test]
        fn test_keys_are_independent() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path());

            store.set("a", "1").unwrap();
            store.set("b", "2").unwrap();
            assert_eq!(store.get("a").unwrap(), Some("1".to_string()));
            assert_eq!(store.get("b").unwrap(), Some("2".to_string()));
        }

        #[test]
        fn test_creates_parent_directory() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path().join("nested").join("deeper"));

            store.set("k", "v").unwrap();
            assert!(store.path().exists());
        }

        #[test]
        fn test_no_temp_file_left_behind() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path());
            store.set("k", "v").unwrap();

            let names: Vec<_> = fs::read_dir(dir.path())
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            assert_eq!(names, vec![STORAGE_FILE_NAME.to_string()]);
        }

        #[test]
        fn test_corrupt_file_is_an_error_on_read() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path());
            fs::write(store.path(), "not json").unwrap();

            let err = store.get("k").unwrap_err();
            assert!(err.is_corrupt());
        }

        #[test]
        fn test_corrupt_file_is_replaced_on_write() {
            let dir = tempfile::tempdir().unwrap();
            let store = JsonFileStore::in_dir(dir.path());
            fs::write(store.path(), "{{{").unwrap();

            store.set("k", "v").unwrap();
            assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        }
    }

    mod memory_store_tests {
        use super::*;

        #[test]
        fn test_roundtrip() {
            let store = MemoryStore::new();
            assert!(store.is_empty());
            store.set("k", "v").unwrap();
            assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
            assert_eq!(store.len(), 1);
        }

        #[test]
        fn test_with_entry() {
            let store = MemoryStore::with_entry("k", "v");
            assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
        }

        #[test]
        fn test_fail_writes() {
            let store = MemoryStore::new();
            store.set_fail_writes(true);
            assert!(store.set("k", "v").is_err());
            assert!(store.is_empty());
        }
    }
}
