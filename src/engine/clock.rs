//! Wall-clock abstraction.
//!
//! Elapsed time is always derived from the clock, never counted by hand,
//! so a late tick simply observes a smaller (or exhausted) remainder.

use std::cell::Cell;
use std::time::Duration;

use tokio::time::Instant;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real clock (honours tokio's paused time in tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Cell<Duration>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Cell::new(Duration::ZERO),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Returns how far the clock has been advanced since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_only_moves_on_advance() {
        let clock = ManualClock::new();
        let start = clock.now();
        assert_eq!(clock.now(), start);

        clock.advance(Duration::from_millis(1500));
        assert_eq!(clock.now() - start, Duration::from_millis(1500));
        assert_eq!(clock.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_clock_through_reference() {
        let clock = ManualClock::new();
        let by_ref: &ManualClock = &clock;
        clock.advance(Duration::from_secs(3));
        assert_eq!(Clock::now(&by_ref), clock.now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_system_clock_follows_paused_runtime() {
        let clock = SystemClock;
        let start = clock.now();
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(clock.now() - start >= Duration::from_secs(10));
    }
}
