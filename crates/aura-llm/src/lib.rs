//! AURA LLM - hosted language model access
//!
//! This crate provides the model collaborator surface for AURA:
//! - [`LanguageModel`]: the trait the dispatcher and capabilities consume
//! - [`GeminiClient`]: Google Gemini over REST (text + inline-image input)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod gemini;
pub mod util;

pub use error::{Error, Result};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_MODEL};

/// Hosted language model collaborator.
///
/// Implementations must be cheap to share behind an `Arc`; one client is
/// reused across every command.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Generate a text reply for a text prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a text reply for a prompt paired with a PNG image
    async fn generate_with_image(&self, prompt: &str, png: &[u8]) -> Result<String> {
        let _ = (prompt, png);
        Err(Error::NotSupported("image input".to_string()))
    }

    /// Summarize a block of text in a few sentences
    async fn summarize(&self, text: &str) -> Result<String> {
        let prompt =
            format!("Please summarize the following text in a few sentences:\n\n{text}");
        self.generate(&prompt).await
    }
}
