//! Draft composition seam
//!
//! The agent never sends mail. Composing opens a pre-populated draft
//! surface and returns immediately; the operator finishes and sends (or
//! discards) the draft out of band.

use std::fmt;

/// A pre-populated email draft
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Recipient address
    pub to: String,
    /// Subject line
    pub subject: String,
    /// Body text
    pub body: String,
}

/// Opens a draft surface for the operator.
///
/// Implementations may block (a desktop window's event loop, for example);
/// callers run them on a blocking task and do not wait for completion.
pub trait Composer: Send + Sync {
    /// Open a draft pre-populated with the given fields
    fn open_draft(&self, draft: Draft);
}

/// Prints the draft to stdout. Stands in for a windowed surface on
/// headless systems.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleComposer;

impl Composer for ConsoleComposer {
    fn open_draft(&self, draft: Draft) {
        println!("--- Email Draft ---");
        println!("To: {}", draft.to);
        println!("Subject: {}", draft.subject);
        println!("Body:\n{}", draft.body);
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "To: {}\nSubject: {}\n\n{}",
            self.to, self.subject, self.body
        )
    }
}
