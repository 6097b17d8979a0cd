//! Visual-context file creation
//!
//! Captures the screen, asks the multimodal model where a new file should
//! live given what is visible, and creates an empty file at the suggested
//! path. The transcript is injected under `command` so the model sees the
//! operator's exact words, not a paraphrase.

use aura_core::{ActionDescriptor, AmbientKey, Capability, DispatchContext, Error, Params, Result};
use aura_llm::LanguageModel;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Captures the screen as a PNG.
pub trait ScreenCapture: Send + Sync {
    /// Grab the full screen and return encoded PNG bytes
    fn capture_png(&self) -> anyhow::Result<Vec<u8>>;
}

/// Backend for systems with no display. Every capture fails, and the
/// capability reports that conversationally.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableScreenCapture;

impl ScreenCapture for UnavailableScreenCapture {
    fn capture_png(&self) -> anyhow::Result<Vec<u8>> {
        Err(anyhow::anyhow!("no screen capture backend is available"))
    }
}

/// Creates a file at a path the model suggests from a screenshot
pub struct VisualContextFile {
    descriptor: ActionDescriptor,
    model: Arc<dyn LanguageModel>,
    screen: Arc<dyn ScreenCapture>,
}

impl VisualContextFile {
    /// Create the capability
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, screen: Arc<dyn ScreenCapture>) -> Self {
        Self {
            descriptor: ActionDescriptor::new(
                "create_file_with_visual_context",
                "Creates a new file at a path chosen from what is currently on screen",
            )
            .with_required("command")
            .with_ambient(AmbientKey::Transcript)
            .with_example(
                "make a new file for what I'm working on",
                json!({"action": "create_file_with_visual_context", "parameters": {}}),
            ),
            model,
            screen,
        }
    }

    fn suggestion_prompt(command: &str) -> String {
        format!(
            "Analyze the attached screenshot and the user's command to determine \
             the best location and name for a new file.\n\
             The user's command was: \"{command}\".\n\n\
             Based on the visual context (open applications, folder structures, \
             file contents), suggest a single, complete, and logical file path \
             (for example 'documents/projects/my_app/new_feature.py').\n\n\
             Return only the file path and nothing else."
        )
    }
}

/// Strip quotes and code fences the model sometimes wraps the path in.
fn clean_suggested_path(raw: &str) -> String {
    raw.trim()
        .trim_matches('`')
        .trim_matches('"')
        .trim_matches('\'')
        .trim()
        .to_string()
}

#[async_trait::async_trait]
impl Capability for VisualContextFile {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
        let command = crate::str_param(params, "command").ok_or_else(|| Error::InvalidParameters {
            action: "create_file_with_visual_context".to_string(),
            missing: vec!["command".to_string()],
        })?;

        let png = match self.screen.capture_png() {
            Ok(png) => png,
            Err(e) => {
                warn!(error = %e, "screen capture failed");
                return Ok("Screen capture is not available on this system.".to_string());
            }
        };

        let prompt = Self::suggestion_prompt(&command);
        let suggested = match self.model.generate_with_image(&prompt, &png).await {
            Ok(text) => clean_suggested_path(&text),
            Err(e) => return Ok(format!("Error getting visual context suggestion: {e}")),
        };

        if suggested.is_empty() || suggested.contains('\n') {
            return Ok("The model did not suggest a usable file path.".to_string());
        }
        debug!(path = %suggested, "model suggested path");

        if let Some(parent) = std::path::Path::new(&suggested).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    return Ok(format!("Error creating file: {e}"));
                }
            }
        }

        match tokio::fs::File::create(&suggested).await {
            Ok(_) => Ok(format!("Successfully created file: {suggested}")),
            Err(e) => Ok(format!("Error creating file: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedPathModel {
        path: String,
    }

    #[async_trait::async_trait]
    impl LanguageModel for FixedPathModel {
        async fn generate(&self, _prompt: &str) -> aura_llm::Result<String> {
            Ok(self.path.clone())
        }

        async fn generate_with_image(
            &self,
            _prompt: &str,
            _png: &[u8],
        ) -> aura_llm::Result<String> {
            Ok(self.path.clone())
        }
    }

    struct BlankScreen;

    impl ScreenCapture for BlankScreen {
        fn capture_png(&self) -> anyhow::Result<Vec<u8>> {
            Ok(vec![0x89, b'P', b'N', b'G'])
        }
    }

    fn params(value: serde_json::Value) -> Params {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_clean_suggested_path_strips_fences_and_quotes() {
        assert_eq!(clean_suggested_path("`notes/todo.md`"), "notes/todo.md");
        assert_eq!(clean_suggested_path("\"a.txt\"\n"), "a.txt");
        assert_eq!(clean_suggested_path("  plain.txt  "), "plain.txt");
    }

    #[tokio::test]
    async fn test_creates_file_at_suggested_path() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("projects").join("new_feature.py");
        let capability = VisualContextFile::new(
            Arc::new(FixedPathModel {
                path: format!("`{}`", target.display()),
            }),
            Arc::new(BlankScreen),
        );

        let result = capability
            .invoke(
                &params(serde_json::json!({"command": "make a file for my project"})),
                &DispatchContext::new(),
            )
            .await
            .unwrap();

        assert!(result.starts_with("Successfully created file:"));
        assert!(target.exists());
    }

    #[tokio::test]
    async fn test_capture_failure_reports_conversationally() {
        let capability = VisualContextFile::new(
            Arc::new(FixedPathModel {
                path: "a.txt".to_string(),
            }),
            Arc::new(UnavailableScreenCapture),
        );

        let result = capability
            .invoke(
                &params(serde_json::json!({"command": "make a file"})),
                &DispatchContext::new(),
            )
            .await
            .unwrap();

        assert_eq!(result, "Screen capture is not available on this system.");
    }

    #[tokio::test]
    async fn test_multiline_suggestion_is_rejected() {
        let capability = VisualContextFile::new(
            Arc::new(FixedPathModel {
                path: "Sure! Here is a path:\nnotes.txt".to_string(),
            }),
            Arc::new(BlankScreen),
        );

        let result = capability
            .invoke(
                &params(serde_json::json!({"command": "make a file"})),
                &DispatchContext::new(),
            )
            .await
            .unwrap();

        assert_eq!(result, "The model did not suggest a usable file path.");
    }
}
