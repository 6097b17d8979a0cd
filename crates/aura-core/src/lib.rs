//! AURA Core - Action Registry and Command Dispatch
//!
//! This crate is the engineering core of the AURA assistant:
//! - Registry: the fixed catalog of capabilities and parameter contracts
//! - Intent: sanitization and parsing of the model's raw reply
//! - Dispatcher: validation, ambient-context injection, and invocation
//!
//! Everything that enters here from the model is untrusted; everything
//! that leaves is a validated call or a typed, non-fatal error.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod intent;
pub mod prompt;
pub mod registry;

pub use context::DispatchContext;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use intent::{parse_intent, sanitize_response, Intent};
pub use prompt::build_interpret_prompt;
pub use registry::{
    ActionDescriptor, ActionRegistry, AmbientKey, Capability, Params, PromptExample,
};
