//! Error types for aura-llm

use thiserror::Error;

/// Language model error type
#[derive(Debug, Error)]
pub enum Error {
    /// No API key was found in the environment
    #[error("missing API key: {0}")]
    MissingApiKey(String),

    /// The API rejected the request
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level failure
    #[error("network error: {0}")]
    Network(String),

    /// The API reply did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The backend does not support the requested input kind
    #[error("not supported: {0}")]
    NotSupported(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
