//! Dispatcher - the only component that turns untrusted natural language
//! into a safe, validated, side-effecting call.
//!
//! Flow per command: build prompt from the registry, obtain the model's
//! raw text, sanitize and parse it into an intent, resolve the action,
//! inject ambient context, validate parameters, invoke. Each call is
//! independent; no state is carried between commands beyond the immutable
//! registry.

use crate::context::DispatchContext;
use crate::error::{Error, Result};
use crate::intent::parse_intent;
use crate::prompt::build_interpret_prompt;
use crate::registry::{ActionRegistry, AmbientKey};
use aura_llm::LanguageModel;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Command interpreter and dispatcher.
pub struct Dispatcher {
    registry: Arc<ActionRegistry>,
    model: Arc<dyn LanguageModel>,
}

impl Dispatcher {
    /// Create a dispatcher over an immutable registry and a model handle
    #[must_use]
    pub fn new(registry: Arc<ActionRegistry>, model: Arc<dyn LanguageModel>) -> Self {
        Self { registry, model }
    }

    /// Get the registry
    #[must_use]
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Interpret one transcript and dispatch the resulting intent.
    ///
    /// The returned string is the capability's human-readable result,
    /// surfaced unchanged. Every error variant is non-fatal: the caller
    /// reports it and re-enters the wait state.
    #[instrument(skip(self, ctx), fields(transcript = %transcript))]
    pub async fn interpret_and_dispatch(
        &self,
        transcript: &str,
        ctx: &DispatchContext,
    ) -> Result<String> {
        let prompt = build_interpret_prompt(transcript, &self.registry);
        let raw = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| Error::Model(e.to_string()))?;

        let intent = parse_intent(&raw)?;
        debug!(action = %intent.action, "model produced intent");

        let capability = self
            .registry
            .lookup(&intent.action)
            .ok_or_else(|| Error::UnknownAction(intent.action.clone()))?;
        let descriptor = capability.descriptor();
        let mut params = intent.parameters;

        // Ambient context is authoritative: injected values overwrite
        // whatever the model may have supplied under the same keys.
        for key in &descriptor.ambient {
            match key {
                AmbientKey::Transcript => {
                    let previous = params.insert(
                        "command".to_string(),
                        serde_json::Value::String(transcript.to_string()),
                    );
                    if previous.is_some() {
                        debug!(
                            action = %descriptor.name,
                            "discarded model-supplied 'command' in favor of the transcript"
                        );
                    }
                }
                AmbientKey::Mailbox => {
                    if ctx.mailbox().is_none() {
                        return Err(Error::ActionExecution {
                            action: descriptor.name.clone(),
                            message: "mail session is not available".to_string(),
                        });
                    }
                }
            }
        }

        let missing: Vec<String> = descriptor
            .required_params
            .iter()
            .filter(|key| !params.contains_key(key.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(Error::InvalidParameters {
                action: descriptor.name.clone(),
                missing,
            });
        }

        // Undeclared parameters are dropped rather than rejected; only the
        // descriptor's named parameters reach the capability.
        let dropped: Vec<String> = params
            .keys()
            .filter(|key| !descriptor.declares_param(key))
            .cloned()
            .collect();
        if !dropped.is_empty() {
            debug!(action = %descriptor.name, ?dropped, "dropping undeclared parameters");
            for key in &dropped {
                params.remove(key);
            }
        }

        let action = descriptor.name.clone();
        match capability.invoke(&params, ctx).await {
            Ok(result) => {
                info!(action = %action, "action completed");
                Ok(result)
            }
            Err(err @ Error::ActionExecution { .. }) => Err(err),
            Err(err) => {
                warn!(action = %action, error = %err, "capability raised past its boundary");
                Err(Error::ActionExecution {
                    action,
                    message: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{ActionDescriptor, Capability, Params};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Model fake that replies with a fixed script regardless of prompt.
    struct ScriptedModel {
        reply: String,
    }

    impl ScriptedModel {
        fn replying(reply: &str) -> Arc<dyn LanguageModel> {
            Arc::new(Self {
                reply: reply.to_string(),
            })
        }
    }

    #[async_trait::async_trait]
    impl LanguageModel for ScriptedModel {
        async fn generate(&self, _prompt: &str) -> aura_llm::Result<String> {
            Ok(self.reply.clone())
        }
    }

    /// Capability fake that counts invocations and records its parameters.
    struct CountingCapability {
        descriptor: ActionDescriptor,
        calls: Arc<AtomicUsize>,
        seen: std::sync::Mutex<Option<Params>>,
    }

    impl CountingCapability {
        fn new(descriptor: ActionDescriptor) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let capability = Arc::new(Self {
                descriptor,
                calls: calls.clone(),
                seen: std::sync::Mutex::new(None),
            });
            (capability, calls)
        }
    }

    #[async_trait::async_trait]
    impl Capability for CountingCapability {
        fn descriptor(&self) -> &ActionDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, params: &Params, _ctx: &DispatchContext) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen.lock().unwrap() = Some(params.clone());
            Ok(format!("invoked {}", self.descriptor.name))
        }
    }

    fn create_file_descriptor() -> ActionDescriptor {
        ActionDescriptor::new("create_file", "Create an empty file").with_required("filepath")
    }

    #[tokio::test]
    async fn test_happy_path_surfaces_capability_result_unchanged() {
        let (capability, calls) = CountingCapability::new(create_file_descriptor());
        let mut registry = ActionRegistry::new();
        registry.register(capability.clone()).unwrap();

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            ScriptedModel::replying(
                "```json\n{\"action\": \"create_file\", \"parameters\": {\"filepath\": \"report.txt\"}}\n```",
            ),
        );

        let result = dispatcher
            .interpret_and_dispatch("create a file named report.txt", &DispatchContext::new())
            .await
            .unwrap();

        assert_eq!(result, "invoked create_file");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let seen = capability.seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            seen.get("filepath").and_then(|v| v.as_str()),
            Some("report.txt")
        );
    }

    #[tokio::test]
    async fn test_unknown_action_invokes_nothing() {
        let (capability, calls) = CountingCapability::new(create_file_descriptor());
        let mut registry = ActionRegistry::new();
        registry.register(capability).unwrap();

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            ScriptedModel::replying("{\"action\": \"format_disk\", \"parameters\": {}}"),
        );

        let err = dispatcher
            .interpret_and_dispatch("format everything", &DispatchContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::UnknownAction(name) if name == "format_disk"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_required_parameter_names_exactly_the_missing_keys() {
        let (capability, calls) = CountingCapability::new(
            ActionDescriptor::new("write_to_file", "Write content to a file")
                .with_required("filepath")
                .with_required("content"),
        );
        let mut registry = ActionRegistry::new();
        registry.register(capability).unwrap();

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            ScriptedModel::replying(
                "{\"action\": \"write_to_file\", \"parameters\": {\"filepath\": \"notes.txt\"}}",
            ),
        );

        let err = dispatcher
            .interpret_and_dispatch("write to notes", &DispatchContext::new())
            .await
            .unwrap_err();

        match err {
            Error::InvalidParameters { action, missing } => {
                assert_eq!(action, "write_to_file");
                assert_eq!(missing, vec!["content".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_response_carries_raw_text_and_invokes_nothing() {
        let (capability, calls) = CountingCapability::new(create_file_descriptor());
        let mut registry = ActionRegistry::new();
        registry.register(capability).unwrap();

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            ScriptedModel::replying("I'm not sure what you mean"),
        );

        let err = dispatcher
            .interpret_and_dispatch("mumble", &DispatchContext::new())
            .await
            .unwrap_err();

        match err {
            Error::MalformedResponse { raw } => assert_eq!(raw, "I'm not sure what you mean"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_transcript_injection_overwrites_model_value() {
        let (capability, _calls) = CountingCapability::new(
            ActionDescriptor::new("create_file_with_visual_context", "Visual-context file")
                .with_required("command")
                .with_ambient(AmbientKey::Transcript),
        );
        let mut registry = ActionRegistry::new();
        registry.register(capability.clone()).unwrap();

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            ScriptedModel::replying(
                "{\"action\": \"create_file_with_visual_context\", \"parameters\": {\"command\": \"model guess\"}}",
            ),
        );

        dispatcher
            .interpret_and_dispatch("make a file for this project", &DispatchContext::new())
            .await
            .unwrap();

        let seen = capability.seen.lock().unwrap().clone().unwrap();
        assert_eq!(
            seen.get("command").and_then(|v| v.as_str()),
            Some("make a file for this project")
        );
    }

    #[tokio::test]
    async fn test_mailbox_requirement_without_session_is_reported() {
        let (capability, calls) = CountingCapability::new(
            ActionDescriptor::new("list_emails", "List inbox")
                .with_optional("count")
                .with_ambient(AmbientKey::Mailbox),
        );
        let mut registry = ActionRegistry::new();
        registry.register(capability).unwrap();

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            ScriptedModel::replying("{\"action\": \"list_emails\", \"parameters\": {\"count\": 5}}"),
        );

        let err = dispatcher
            .interpret_and_dispatch("check my email", &DispatchContext::new())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ActionExecution { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undeclared_parameters_are_dropped() {
        let (capability, _calls) = CountingCapability::new(create_file_descriptor());
        let mut registry = ActionRegistry::new();
        registry.register(capability.clone()).unwrap();

        let dispatcher = Dispatcher::new(
            Arc::new(registry),
            ScriptedModel::replying(
                "{\"action\": \"create_file\", \"parameters\": {\"filepath\": \"a.txt\", \"mood\": \"excited\"}}",
            ),
        );

        dispatcher
            .interpret_and_dispatch("create a.txt", &DispatchContext::new())
            .await
            .unwrap();

        let seen = capability.seen.lock().unwrap().clone().unwrap();
        assert!(seen.contains_key("filepath"));
        assert!(!seen.contains_key("mood"));
    }
}
