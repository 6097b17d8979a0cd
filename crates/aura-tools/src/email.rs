//! Email capabilities
//!
//! All four actions require the ambient mail session except
//! `compose_email`, which only opens a local draft surface. Mail API
//! failures are converted to result strings; the absence of a session is
//! detected structurally before invocation and never reaches this module.

use crate::compose::{Composer, Draft};
use aura_core::{
    ActionDescriptor, AmbientKey, Capability, DispatchContext, Error, Params, Result,
};
use aura_llm::LanguageModel;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Inbox entries fetched when the operator does not say how many
const DEFAULT_LIST_COUNT: u64 = 5;

fn missing(action: &str, param: &str) -> Error {
    Error::InvalidParameters {
        action: action.to_string(),
        missing: vec![param.to_string()],
    }
}

fn session_gone(action: &str) -> Error {
    Error::ActionExecution {
        action: action.to_string(),
        message: "mail session is not available".to_string(),
    }
}

// ============================================================================
// list_emails
// ============================================================================

/// Lists the most recent inbox messages
pub struct ListEmails {
    descriptor: ActionDescriptor,
}

impl ListEmails {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "list_emails",
                "Lists the most recent emails in the inbox",
            )
            .with_optional("count")
            .with_ambient(AmbientKey::Mailbox)
            .with_example(
                "check my email",
                json!({"action": "list_emails", "parameters": {}}),
            )
            .with_example(
                "show my last three emails",
                json!({"action": "list_emails", "parameters": {"count": 3}}),
            ),
        }
    }
}

impl Default for ListEmails {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for ListEmails {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, ctx: &DispatchContext) -> Result<String> {
        let mailbox = ctx.mailbox().ok_or_else(|| session_gone("list_emails"))?;
        let count = crate::u64_param(params, "count").unwrap_or(DEFAULT_LIST_COUNT) as usize;

        let summaries = match mailbox.list(count).await {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(error = %e, "inbox listing failed");
                return Ok(format!("An error occurred: {e}"));
            }
        };

        if summaries.is_empty() {
            return Ok("No new messages found.".to_string());
        }

        let mut lines = vec![format!("Your {} most recent emails:", summaries.len())];
        for (index, summary) in summaries.iter().enumerate() {
            lines.push(format!(
                "{}. From {}: {} (id {})",
                index + 1,
                summary.from,
                summary.subject,
                summary.id
            ));
        }
        Ok(lines.join("\n"))
    }
}

// ============================================================================
// read_email
// ============================================================================

/// Reads a single email by its message id
pub struct ReadEmail {
    descriptor: ActionDescriptor,
}

impl ReadEmail {
    /// Create the capability
    #[must_use]
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor::new("read_email", "Reads a single email by its message id")
                .with_required("message_id")
                .with_ambient(AmbientKey::Mailbox),
        }
    }
}

impl Default for ReadEmail {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Capability for ReadEmail {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, ctx: &DispatchContext) -> Result<String> {
        let mailbox = ctx.mailbox().ok_or_else(|| session_gone("read_email"))?;
        let message_id =
            crate::str_param(params, "message_id").ok_or_else(|| missing("read_email", "message_id"))?;

        match mailbox.get(&message_id).await {
            Ok(message) => Ok(format!(
                "From: {}\nSubject: {}\n\n{}",
                message.from, message.subject, message.body
            )),
            Err(e) => Ok(format!("An error occurred: {e}")),
        }
    }
}

// ============================================================================
// summarize_email
// ============================================================================

/// Fetches an email and summarizes its body with the language model
pub struct SummarizeEmail {
    descriptor: ActionDescriptor,
    model: Arc<dyn LanguageModel>,
}

impl SummarizeEmail {
    /// Create the capability
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "summarize_email",
                "Fetches an email and summarizes its body in a few sentences",
            )
            .with_required("message_id")
            .with_ambient(AmbientKey::Mailbox)
            .with_example(
                "summarize that email",
                json!({"action": "summarize_email", "parameters": {"message_id": "<the message id>"}}),
            ),
            model,
        }
    }
}

#[async_trait::async_trait]
impl Capability for SummarizeEmail {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, ctx: &DispatchContext) -> Result<String> {
        let mailbox = ctx.mailbox().ok_or_else(|| session_gone("summarize_email"))?;
        let message_id = crate::str_param(params, "message_id")
            .ok_or_else(|| missing("summarize_email", "message_id"))?;

        let message = match mailbox.get(&message_id).await {
            Ok(message) => message,
            Err(e) => return Ok(format!("An error occurred: {e}")),
        };

        match self.model.summarize(&message.body).await {
            Ok(summary) => Ok(format!(
                "Summary of the email from {}: {}",
                message.from, summary
            )),
            Err(e) => Ok(format!("Could not summarize the text: {e}")),
        }
    }
}

// ============================================================================
// compose_email
// ============================================================================

/// Opens a pre-populated draft window
pub struct ComposeEmail {
    descriptor: ActionDescriptor,
    composer: Arc<dyn Composer>,
}

impl ComposeEmail {
    /// Create the capability
    #[must_use]
    pub fn new(composer: Arc<dyn Composer>) -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "compose_email",
                "Opens a draft email window, optionally pre-populated",
            )
            .with_optional("to")
            .with_optional("subject")
            .with_optional("body")
            .with_example(
                "write an email to alice about the meeting",
                json!({"action": "compose_email", "parameters": {"to": "alice", "subject": "the meeting"}}),
            ),
            composer,
        }
    }
}

#[async_trait::async_trait]
impl Capability for ComposeEmail {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let draft = Draft {
            to: crate::str_param(params, "to").unwrap_or_default(),
            subject: crate::str_param(params, "subject").unwrap_or_default(),
            body: crate::str_param(params, "body").unwrap_or_default(),
        };
        debug!(to = %draft.to, subject = %draft.subject, "opening draft");

        // The draft surface may run its own event loop; detach it so the
        // agent returns to listening immediately.
        let composer = Arc::clone(&self.composer);
        tokio::task::spawn_blocking(move || composer.open_draft(draft));

        Ok("Opening a draft email window.".to_string())
    }
}
