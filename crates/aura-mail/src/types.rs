//! Mail domain types and the [`Mailbox`] trait

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One inbox entry as shown in a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageSummary {
    /// Provider-assigned message id
    pub id: String,
    /// Subject header, or a placeholder when absent
    pub subject: String,
    /// From header, or a placeholder when absent
    pub from: String,
}

/// A fully fetched message with a plain-text body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Provider-assigned message id
    pub id: String,
    /// Subject header
    pub subject: String,
    /// From header
    pub from: String,
    /// Decoded plain-text body, or the provider snippet as a fallback
    pub body: String,
}

/// An authenticated mail session.
///
/// Capabilities receive this through the dispatch context rather than
/// constructing their own clients; one session is shared for the life
/// of the agent.
#[async_trait::async_trait]
pub trait Mailbox: Send + Sync {
    /// List the most recent inbox messages, newest first
    async fn list(&self, count: usize) -> Result<Vec<MessageSummary>>;

    /// Fetch a single message by id
    async fn get(&self, id: &str) -> Result<Message>;
}
