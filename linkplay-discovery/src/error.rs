//! Error types for the discovery system.
//!
//! None of these reach callers of [`crate::get`]; the orchestrator logs them
//! and degrades to an empty result.

use thiserror::Error;

/// Error type for discovery operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Socket creation, option setting, or send failures
    #[error("Network error: {0}")]
    Network(String),
    /// A network prefix string that is not three dotted octets
    #[error("Invalid network prefix: {0}")]
    InvalidPrefix(String),
}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
