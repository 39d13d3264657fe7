//! Keeping the display awake while a countdown runs.
//!
//! The wake lock is strictly best-effort. It is requested when a countdown
//! starts or resumes and released when the countdown pauses, resets or the
//! host shuts down. Failures are logged and never interrupt the timer; use
//! [`WakeLockError::is_recoverable`] to confirm.
//!
//! # Example
//!
//! ```no_run
//! use pomodoro_cycle::wakelock::{InhibitorWakeLock, WakeLock};
//!
//! let lock = InhibitorWakeLock::new();
//! if lock.acquire().is_ok() {
//!     // ... countdown ...
//!     let _ = lock.release();
//! }
//! ```

pub mod error;
mod inhibitor;

pub use error::WakeLockError;
pub use inhibitor::{inhibitor_available, InhibitorWakeLock};

/// A screen wake lock.
///
/// Both operations are idempotent: acquiring a held lock or releasing a
/// free one succeeds without doing anything.
pub trait WakeLock {
    /// Requests that the display stay awake.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform refuses the request.
    fn acquire(&self) -> Result<(), WakeLockError>;

    /// Drops any held lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the held lock could not be released.
    fn release(&self) -> Result<(), WakeLockError>;

    /// Returns true while a lock is held.
    fn is_held(&self) -> bool;
}

/// Wake lock for hosts without the capability; never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        Ok(())
    }

    fn release(&self) -> Result<(), WakeLockError> {
        Ok(())
    }

    fn is_held(&self) -> bool {
        false
    }
}

/// Mock wake lock for testing.
#[derive(Debug, Default)]
pub struct MockWakeLock {
    held: std::sync::atomic::AtomicBool,
    acquire_calls: std::sync::atomic::AtomicUsize,
    release_calls: std::sync::atomic::AtomicUsize,
    should_fail_acquire: std::sync::atomic::AtomicBool,
}

impl MockWakeLock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail_acquire(&self, should_fail: bool) {
        self.should_fail_acquire
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn acquire_call_count(&self) -> usize {
        self.acquire_calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    #[must_use]
    pub fn release_call_count(&self) -> usize {
        self.release_calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl WakeLock for MockWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        self.acquire_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if self
            .should_fail_acquire
            .load(std::sync::atomic::Ordering::SeqCst)
        {
            return Err(WakeLockError::Unsupported);
        }
        self.held.store(true, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    fn release(&self) -> Result<(), WakeLockError> {
        self.release_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.held.store(false, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.held.load(std::sync::atomic::Ordering::SeqCst)
    }
}
