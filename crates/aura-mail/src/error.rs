//! Error types for aura-mail

use thiserror::Error;

/// Mail error type
#[derive(Debug, Error)]
pub enum Error {
    /// No credentials are available
    #[error("mail authentication unavailable: {0}")]
    Auth(String),

    /// The mail API rejected the request
    #[error("mail API error: {0}")]
    Api(String),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// The requested message does not exist
    #[error("message not found: {0}")]
    NotFound(String),

    /// A message body could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
