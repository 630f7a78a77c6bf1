//! Clock abstraction for testable scheduling.
//!
//! The polling engine sleeps between sweeps and measures sweep duration;
//! injecting the clock lets tests drive that schedule deterministically
//! instead of waiting out real intervals.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// Time source for scheduling and duration measurement.
///
/// Production code uses [`RealClock`]; tests inject [`TestClock`] to make
/// interval-driven behavior run instantly.
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Returns the current instant for duration measurements.
    fn now(&self) -> Instant;

    /// Sleeps for the specified duration.
    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Production clock backed by the system and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealClock;

impl RealClock {
    /// Creates a new real clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Deterministic clock for tests.
///
/// Sleeping advances virtual time immediately and yields once, so a loop
/// that waits on `sleep` ticks as fast as the test scheduler allows. Clones
/// share the same virtual timeline.
#[derive(Debug, Clone)]
pub struct TestClock {
    base: Instant,
    offset_ns: Arc<AtomicU64>,
}

impl TestClock {
    /// Creates a test clock starting at the current instant.
    pub fn new() -> Self {
        Self { base: Instant::now(), offset_ns: Arc::new(AtomicU64::new(0)) }
    }

    /// Advances virtual time by `duration`.
    pub fn advance(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos().min(u128::from(u64::MAX))).unwrap_or(u64::MAX);
        self.offset_ns.fetch_add(ns, Ordering::AcqRel);
    }

    /// Virtual time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_ns.load(Ordering::Acquire))
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.base + self.elapsed()
    }

    fn sleep(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        self.advance(duration);
        Box::pin(tokio::task::yield_now())
    }
}
