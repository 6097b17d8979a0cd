//! AURA Mail - mailbox access for the AURA assistant
//!
//! This crate provides the mail collaborator surface:
//! - [`Mailbox`]: the session trait email capabilities consume
//! - [`GmailClient`]: Gmail REST implementation over a bearer token

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod gmail;
pub mod types;

pub use error::{Error, Result};
pub use gmail::{default_token_path, GmailClient};
pub use types::{Mailbox, Message, MessageSummary};
