//! Expiring Map - a TTL map with an inspectable expired store
//!
//! Entries older than the map's TTL disappear from the normal map interface
//! and move into a separate expired store, where they stay until the caller
//! removes them. Expiry is lazy and driven by the operations themselves.
//!
//! ```
//! use std::time::Duration;
//! use expiring_map::{ExpiringMap, ManualClock};
//!
//! let clock = ManualClock::new();
//! let mut map = ExpiringMap::with_clock(Duration::from_millis(100), clock.clone()).unwrap();
//!
//! map.put("a", 1);
//! clock.advance(Duration::from_millis(150));
//!
//! assert_eq!(map.get("a"), None);
//! assert_eq!(map.expired_get("a"), Some(&1));
//! ```

pub mod config;
pub mod error;
pub mod map;
pub mod shell;

pub use config::Config;
pub use error::{MapError, Result};
pub use map::{Clock, ExpiringMap, ExpiryStats, ManualClock, MonotonicClock};
pub use shell::{Command, Response, Shell};
