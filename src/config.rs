//! Configuration Module
//!
//! Handles loading the map configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default TTL in milliseconds (five minutes)
pub const DEFAULT_TTL_MS: u64 = 300_000;

/// Map configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Time-to-live shared by every entry, in milliseconds
    pub ttl_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `EXPIRING_MAP_TTL_MS` - Entry TTL in milliseconds (default: 300000)
    ///
    /// Unparseable values fall back to the default. A zero TTL is passed
    /// through and rejected when the map is built.
    pub fn from_env() -> Self {
        Self {
            ttl_ms: env::var("EXPIRING_MAP_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_MS),
        }
    }

    /// Returns the configured TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
        }
    }
}
