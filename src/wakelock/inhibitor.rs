//! Process-based wake lock.
//!
//! Idle sleep is inhibited for as long as a helper process lives:
//! `caffeinate` on macOS, `systemd-inhibit` on Linux. Releasing the lock
//! kills the helper.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use super::error::WakeLockError;
use super::WakeLock;

#[cfg(target_os = "macos")]
const INHIBITOR_PROGRAM: Option<(&str, &[&str])> = Some(("/usr/bin/caffeinate", &["-di"]));

#[cfg(target_os = "linux")]
const INHIBITOR_PROGRAM: Option<(&str, &[&str])> = Some((
    "systemd-inhibit",
    &[
        "--what=idle",
        "--who=pomodoro-cycle",
        "--why=Pomodoro countdown running",
        "--mode=block",
        "sleep",
        "infinity",
    ],
));

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
const INHIBITOR_PROGRAM: Option<(&str, &[&str])> = None;

/// Returns true if an inhibitor program is known for this platform.
///
/// On macOS this also checks that `caffeinate` is installed.
#[must_use]
pub fn inhibitor_available() -> bool {
    match INHIBITOR_PROGRAM {
        Some((program, _)) if program.starts_with('/') => Path::new(program).exists(),
        Some(_) => true,
        None => false,
    }
}

/// Wake lock backed by a long-running inhibitor process.
#[derive(Debug, Default)]
pub struct InhibitorWakeLock {
    child: Mutex<Option<Child>>,
}

impl InhibitorWakeLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WakeLock for InhibitorWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        let Some((program, args)) = INHIBITOR_PROGRAM else {
            return Err(WakeLockError::Unsupported);
        };

        let mut guard = self
            .child
            .lock()
            .map_err(|e| WakeLockError::SpawnFailed(program.to_string(), e.to_string()))?;
        if guard.is_some() {
            return Ok(());
        }

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| WakeLockError::SpawnFailed(program.to_string(), e.to_string()))?;

        info!("Wake lock acquired (pid {})", child.id());
        *guard = Some(child);
        Ok(())
    }

    fn release(&self) -> Result<(), WakeLockError> {
        let mut guard = self
            .child
            .lock()
            .map_err(|e| WakeLockError::ReleaseFailed(e.to_string()))?;
        let Some(mut child) = guard.take() else {
            return Ok(());
        };

        child
            .kill()
            .map_err(|e| WakeLockError::ReleaseFailed(e.to_string()))?;
        // Reap so the helper does not linger as a zombie.
        if let Err(e) = child.wait() {
            debug!("Wake lock helper wait failed: {}", e);
        }
        info!("Wake lock released");
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.child.lock().map(|g| g.is_some()).unwrap_or(false)
    }
}

impl Drop for InhibitorWakeLock {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Wake lock not released on shutdown: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_lock_is_not_held() {
        let lock = InhibitorWakeLock::new();
        assert!(!lock.is_held());
    }

    #[test]
    fn test_release_without_acquire_is_noop() {
        let lock = InhibitorWakeLock::new();
        assert!(lock.release().is_ok());
        assert!(lock.release().is_ok());
    }

    #[test]
    #[ignore = "spawns a platform inhibitor process"]
    fn test_acquire_release_cycle() {
        let lock = InhibitorWakeLock::new();
        if !inhibitor_available() {
            return;
        }
        lock.acquire().unwrap();
        assert!(lock.is_held());
        lock.acquire().unwrap();
        lock.release().unwrap();
        assert!(!lock.is_held());
    }
}
