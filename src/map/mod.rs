//! Map Module
//!
//! Provides the TTL map with its expired store, clocks, views and statistics.

mod clock;
mod stats;
mod store;
mod view;


// Re-export public types
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use stats::ExpiryStats;
pub use store::ExpiringMap;
pub use view::{Entries, Keys, Values};
