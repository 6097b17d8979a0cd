//! Error types for aura-core
//!
//! Every variant here is non-fatal to the process: the agent loop reports
//! the display string to the operator and returns to waiting for the next
//! command. Only setup-time failures (handled outside this crate) may stop
//! the dispatch loop from starting.

use thiserror::Error;

/// Dispatch error type
#[derive(Debug, Error)]
pub enum Error {
    /// An action with the same name is already registered
    #[error("action '{0}' is already registered")]
    DuplicateAction(String),

    /// The model's text could not be parsed into the two-key intent shape
    #[error("malformed model response: {raw}")]
    MalformedResponse {
        /// The raw, unsanitized model text
        raw: String,
    },

    /// The intent names an action absent from the registry
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// Required parameters are missing after context injection
    #[error("invalid parameters for action '{action}': missing {missing:?}")]
    InvalidParameters {
        /// The resolved action name
        action: String,
        /// Exactly the required keys that were absent
        missing: Vec<String>,
    },

    /// The capability failed in a way it did not convert to a result string
    #[error("action '{action}' failed: {message}")]
    ActionExecution {
        /// The invoked action name
        action: String,
        /// The underlying cause
        message: String,
    },

    /// The model collaborator could not produce a response
    #[error("model error: {0}")]
    Model(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
