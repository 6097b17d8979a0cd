//! AURA Tools - built-in capabilities
//!
//! Everything the assistant can actually do lives here: filesystem
//! operations, email access, draft composition, and the visual-context
//! file creator. [`register_builtins`] wires the full catalog into an
//! [`ActionRegistry`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compose;
pub mod email;
pub mod files;
pub mod vision;

pub use compose::{Composer, ConsoleComposer, Draft};
pub use vision::{ScreenCapture, UnavailableScreenCapture};

use aura_core::{ActionRegistry, Params};
use aura_llm::LanguageModel;
use std::sync::Arc;

/// Collaborators shared by the built-in capabilities
#[derive(Clone)]
pub struct BuiltinsConfig {
    /// Language model used for summarization and visual context
    pub model: Arc<dyn LanguageModel>,
    /// Draft window opener
    pub composer: Arc<dyn Composer>,
    /// Screen capture backend
    pub screen: Arc<dyn ScreenCapture>,
}

/// Register the full built-in catalog.
///
/// Registration order is fixed so the interpretation prompt stays stable
/// across runs.
pub fn register_builtins(
    registry: &mut ActionRegistry,
    config: &BuiltinsConfig,
) -> aura_core::Result<()> {
    registry.register(Arc::new(files::CreateFile::new()))?;
    registry.register(Arc::new(files::WriteToFile::new()))?;
    registry.register(Arc::new(files::ReadFile::new()))?;
    registry.register(Arc::new(files::DeleteFile::new()))?;
    registry.register(Arc::new(files::ListFiles::new()))?;
    registry.register(Arc::new(files::SearchFiles::new()))?;
    registry.register(Arc::new(email::ListEmails::new()))?;
    registry.register(Arc::new(email::ReadEmail::new()))?;
    registry.register(Arc::new(email::SummarizeEmail::new(Arc::clone(
        &config.model,
    ))))?;
    registry.register(Arc::new(email::ComposeEmail::new(Arc::clone(
        &config.composer,
    ))))?;
    registry.register(Arc::new(vision::VisualContextFile::new(
        Arc::clone(&config.model),
        Arc::clone(&config.screen),
    )))?;
    Ok(())
}

/// Extract a string parameter, accepting numbers the model typed loosely.
pub(crate) fn str_param(params: &Params, key: &str) -> Option<String> {
    match params.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Extract an unsigned integer parameter, accepting numeric strings.
pub(crate) fn u64_param(params: &Params, key: &str) -> Option<u64> {
    match params.get(key)? {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: serde_json::Value) -> Params {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_str_param_accepts_numbers() {
        let params = params(serde_json::json!({"filepath": "notes.txt", "count": 3}));
        assert_eq!(str_param(&params, "filepath").as_deref(), Some("notes.txt"));
        assert_eq!(str_param(&params, "count").as_deref(), Some("3"));
        assert_eq!(str_param(&params, "missing"), None);
    }

    #[test]
    fn test_u64_param_accepts_numeric_strings() {
        let params = params(serde_json::json!({"count": "5", "limit": 10, "bad": "many"}));
        assert_eq!(u64_param(&params, "count"), Some(5));
        assert_eq!(u64_param(&params, "limit"), Some(10));
        assert_eq!(u64_param(&params, "bad"), None);
    }
}
