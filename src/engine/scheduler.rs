//! Polling-cycle scheduling.
//!
//! A scheduler owns at most one polling cycle. Starting a cycle always
//! replaces the previous one, so a tick from a superseded cycle can never
//! be delivered after a transition.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Polling cadence while running.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Arms and cancels the periodic polling cycle.
pub trait Scheduler {
    /// Cancels any active cycle and establishes a new one.
    fn start(&mut self);

    /// Cancels the active cycle, if any.
    fn stop(&mut self);

    /// Returns true while a cycle is active.
    fn is_active(&self) -> bool;
}

// ============================================================================
// IntervalScheduler
// ============================================================================

/// Scheduler backed by a tokio interval.
///
/// Must be started from within a tokio runtime.
#[derive(Debug)]
pub struct IntervalScheduler {
    period: Duration,
    interval: Option<Interval>,
    cycle: u64,
}

impl IntervalScheduler {
    /// Creates an inactive scheduler ticking every `period`.
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
            cycle: 0,
        }
    }

    /// Returns the identifier of the most recently started cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Waits for the next tick of the active cycle.
    ///
    /// Never completes while no cycle is active. Cancel-safe, so it can be
    /// used as a `tokio::select!` branch.
    pub async fn tick(&mut self) -> u64 {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
                self.cycle
            }
            None => std::future::pending().await,
        }
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Scheduler for IntervalScheduler {
    fn start(&mut self) {
        // The caller renders immediately, so the first tick is one period out.
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
        self.cycle += 1;
        debug!("Polling cycle {} started", self.cycle);
    }

    fn stop(&mut self) {
        if self.interval.take().is_some() {
            debug!("Polling cycle {} stopped", self.cycle);
        }
    }

    fn is_active(&self) -> bool {
        self.interval.is_some()
    }
}

// ============================================================================
// ManualScheduler
// ============================================================================

/// Scheduler that only records what it was asked to do.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    active: bool,
    starts: usize,
    stops: usize,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start_count(&self) -> usize {
        self.starts
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self) {
        self.active = true;
        self.starts += 1;
    }

    fn stop(&mut self) {
        self.active = false;
        self.stops += 1;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod manual_scheduler_tests {
        use super::*;

        #[test]
        fn test_records_calls() {
            let mut scheduler = ManualScheduler::new();
            assert!(!scheduler.is_active());

            scheduler.start();
            assert!(scheduler.is_active());
            scheduler.start();
            scheduler.stop();

            assert!(!scheduler.is_active());
            assert_eq!(scheduler.start_count(), 2);
            assert_eq!(scheduler.stop_count(), 1);
        }
    }

    mod interval_scheduler_tests {
        use super::*;
        use tokio::time::timeout;

        #[tokio::test(start_paused = true)]
        async fn test_inactive_never_ticks() {
            let mut scheduler = IntervalScheduler::default();
            let result = timeout(Duration::from_secs(5), scheduler.tick()).await;
            assert!(result.is_err());
        }

        #[tokio::test(start_paused = true)]
        async fn test_ticks_at_period() {
            let mut scheduler = IntervalScheduler::new(Duration::from_millis(500));
            scheduler.start();
            let started = Instant::now();

            scheduler.tick().await;
            assert_eq!(Instant::now() - started, Duration::from_millis(500));

            scheduler.tick().await;
            assert_eq!(Instant::now() - started, Duration::from_millis(1000));
        }

        #[tokio::test(start_paused = true)]
        async fn test_restart_replaces_cycle() {
            let mut scheduler = IntervalScheduler::default();
            scheduler.start();
            assert_eq!(scheduler.cycle(), 1);

            tokio::time::advance(Duration::from_millis(400)).await;
            scheduler.start();
            assert_eq!(scheduler.cycle(), 2);
            let restarted = Instant::now();

            let cycle = scheduler.tick().await;
            assert_eq!(cycle, 2);
            assert_eq!(Instant::now() - restarted, TICK_INTERVAL);
        }

        #[tokio::test(start_paused = true)]
        async fn test_stop_cancels_pending_tick() {
            let mut scheduler = IntervalScheduler::default();
            scheduler.start();
            scheduler.stop();
            assert!(!scheduler.is_active());

            let result = timeout(Duration::from_secs(2), scheduler.tick()).await;
            assert!(result.is_err());
        }
    }
}
