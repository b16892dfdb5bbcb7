//! Clock Module
//!
//! Time sources used to stamp insertions and decide expiry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// == Clock Trait ==
/// A monotonic time source.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Blocks (or pretends to) for the given duration.
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

// == Monotonic Clock ==
/// Reads `Instant::now()`, unaffected by wall-clock adjustments.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Manual Clock ==
/// A clock that only moves when told to.
///
/// Clones share the same elapsed time, so a caller can keep a handle and
/// advance the clock owned by a map.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    // == Constructor ==
    /// Creates a manual clock frozen at the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    // == Advance ==
    /// Moves the clock forward by `duration`. Saturates instead of wrapping,
    /// so the clock never runs backwards.
    pub fn advance(&self, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let _ = self
            .elapsed_nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |elapsed| {
                Some(elapsed.saturating_add(nanos))
            });
    }

    /// Time advanced since construction.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}
