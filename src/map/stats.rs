//! Expiry Statistics Module
//!
//! Tracks lookup hits and misses along with sweep activity.

use serde::Serialize;

// == Expiry Stats ==
/// Counters describing how the map has been used.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExpiryStats {
    /// Number of `get` calls that found a live entry
    pub hits: u64,
    /// Number of `get` calls that found nothing (absent or just expired)
    pub misses: u64,
    /// Number of entries moved from the live store into the expired store
    pub expirations: u64,
    /// Number of full sweep passes
    pub full_sweeps: u64,
    /// Live entries at snapshot time
    pub live_entries: usize,
    /// Expired entries at snapshot time
    pub expired_entries: usize,
}

impl ExpiryStats {
    // == Constructor ==
    /// Creates a new ExpiryStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Sweep ==
    /// Records one full sweep pass that moved `moved` entries.
    pub fn record_full_sweep(&mut self, moved: usize) {
        self.full_sweeps += 1;
        self.expirations += moved as u64;
    }

    /// Records a single entry moved by a point lookup.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    // == Update Entry Counts ==
    /// Updates the live and expired entry counts.
    pub fn set_entry_counts(&mut self, live: usize, expired: usize) {
        self.live_entries = live;
        self.expired_entries = expired;
    }
}
