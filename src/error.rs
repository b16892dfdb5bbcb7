//! Error types for the expiring map
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Map Error Enum ==
/// Unified error type for the expiring map and its shell.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// TTL rejected at construction
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),

    /// Shell input that does not parse into a command
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

// == Result Type Alias ==
/// Convenience Result type for the expiring map.
pub type Result<T> = std::result::Result<T, MapError>;
