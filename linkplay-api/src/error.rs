//! Error types for the command client

use thiserror::Error;

/// Errors that can occur while talking to a speaker's command endpoint
///
/// These only surface through [`CommandClient::try_send`](crate::CommandClient::try_send).
/// The regular [`send`](crate::CommandClient::send) path collapses every
/// variant into an absent reply.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection refused, timed out, DNS failure, or an unreadable body
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// The device answered with something other than HTTP 200
    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    /// The supplied address could not be turned into a request URL
    #[error("Invalid device address: {0}")]
    InvalidAddress(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
