//! Error types for aura-audio

use thiserror::Error;

/// Audio error type
#[derive(Debug, Error)]
pub enum Error {
    /// Audio device error
    #[error("audio device error: {0}")]
    AudioDevice(String),

    /// Audio stream error
    #[error("audio stream error: {0}")]
    AudioStream(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// A required backend is not configured
    #[error("not enabled: {0}")]
    NotEnabled(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
