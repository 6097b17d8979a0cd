//! Dispatch context - ambient data the model must never supply
//!
//! The context carries the authenticated mail session handle and the
//! original transcript for the duration of one command. The dispatcher
//! treats it as read-only; the session's lifecycle is owned by the
//! authentication collaborator.

use aura_mail::Mailbox;
use std::sync::Arc;

/// Ambient data supplied by the dispatcher, never derived from model output.
#[derive(Clone, Default)]
pub struct DispatchContext {
    mailbox: Option<Arc<dyn Mailbox>>,
    transcript: Option<String>,
}

impl DispatchContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an authenticated mail session handle
    #[must_use]
    pub fn with_mailbox(mut self, mailbox: Arc<dyn Mailbox>) -> Self {
        self.mailbox = Some(mailbox);
        self
    }

    /// Attach the original transcript text
    #[must_use]
    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.transcript = Some(transcript.into());
        self
    }

    /// The mail session handle, if one is available
    #[must_use]
    pub fn mailbox(&self) -> Option<&Arc<dyn Mailbox>> {
        self.mailbox.as_ref()
    }

    /// The original transcript, if set
    #[must_use]
    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }
}

impl std::fmt::Debug for DispatchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchContext")
            .field("mailbox", &self.mailbox.as_ref().map(|_| "<session>"))
            .field("transcript", &self.transcript)
            .finish()
    }
}
