//! Registry - Action registration and lookup
//!
//! The registry is the authoritative catalog of invocable capabilities and
//! their parameter contracts. It is built once at startup, presented to the
//! prompt-construction step so the model is constrained to known action
//! names, and read-only during dispatch.

use crate::context::DispatchContext;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Named parameter map delivered to a capability.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Ambient context a capability needs that the model must never supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbientKey {
    /// The authenticated mail session handle
    Mailbox,
    /// The original spoken transcript, injected under the `command` key
    Transcript,
}

impl AmbientKey {
    /// Parameter key this ambient value is injected under, if it is
    /// injected into the parameter map at all (handles are passed through
    /// the [`DispatchContext`] instead).
    #[must_use]
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            Self::Mailbox => None,
            Self::Transcript => Some("command"),
        }
    }
}

/// A literal input → intent example used to anchor the model's output shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptExample {
    /// Example spoken command
    pub utterance: String,
    /// The intent JSON the model is expected to emit for it
    pub intent: serde_json::Value,
}

/// Describes one capability: its stable name and parameter contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Unique action name, stable across the catalog
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter names that must be present after context injection
    pub required_params: Vec<String>,
    /// Parameter names with capability-side defaults
    pub optional_params: Vec<String>,
    /// Ambient context this capability requires, declared structurally
    #[serde(default)]
    pub ambient: Vec<AmbientKey>,
    /// Examples contributed to the interpretation prompt
    #[serde(default)]
    pub examples: Vec<PromptExample>,
}

impl ActionDescriptor {
    /// Create a new descriptor with no parameters
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required_params: Vec::new(),
            optional_params: Vec::new(),
            ambient: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Add a required parameter name
    #[must_use]
    pub fn with_required(mut self, param: impl Into<String>) -> Self {
        self.required_params.push(param.into());
        self
    }

    /// Add an optional parameter name
    #[must_use]
    pub fn with_optional(mut self, param: impl Into<String>) -> Self {
        self.optional_params.push(param.into());
        self
    }

    /// Declare an ambient context requirement
    #[must_use]
    pub fn with_ambient(mut self, key: AmbientKey) -> Self {
        self.ambient.push(key);
        self
    }

    /// Add a prompt example
    #[must_use]
    pub fn with_example(mut self, utterance: impl Into<String>, intent: serde_json::Value) -> Self {
        self.examples.push(PromptExample {
            utterance: utterance.into(),
            intent,
        });
        self
    }

    /// Whether `param` is declared (required, optional, or ambient-injected)
    #[must_use]
    pub fn declares_param(&self, param: &str) -> bool {
        self.required_params.iter().any(|p| p == param)
            || self.optional_params.iter().any(|p| p == param)
            || self
                .ambient
                .iter()
                .filter_map(AmbientKey::param_name)
                .any(|p| p == param)
    }
}

/// Trait for capability implementations
#[async_trait::async_trait]
pub trait Capability: Send + Sync {
    /// Get the action descriptor
    fn descriptor(&self) -> &ActionDescriptor;

    /// Invoke the capability with a validated parameter map.
    ///
    /// Returns a human-readable result string. Failures of the wrapped
    /// resource should be converted to a result string here; anything that
    /// propagates as an error is caught at the dispatch boundary and
    /// wrapped as [`Error::ActionExecution`].
    async fn invoke(&self, params: &Params, ctx: &DispatchContext) -> Result<String>;
}

/// Catalog of invocable capabilities.
///
/// Registered once at process start, immutable afterward. `catalog_names`
/// preserves registration order so the prompt text stays stable across
/// calls.
pub struct ActionRegistry {
    order: Vec<String>,
    actions: HashMap<String, Arc<dyn Capability>>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            actions: HashMap::new(),
        }
    }

    /// Register a capability.
    ///
    /// Fails with [`Error::DuplicateAction`] if the name is already
    /// present; the registry is unchanged on failure.
    pub fn register(&mut self, capability: Arc<dyn Capability>) -> Result<()> {
        let name = capability.descriptor().name.clone();
        if self.actions.contains_key(&name) {
            return Err(Error::DuplicateAction(name));
        }
        debug!(action = %name, "registering action");
        self.order.push(name.clone());
        self.actions.insert(name, capability);
        Ok(())
    }

    /// Look up a capability by name. Pure, no side effects.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.actions.get(name).cloned()
    }

    /// Check if an action exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// All action names in registration order
    #[must_use]
    pub fn catalog_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// All descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.actions.get(name))
            .map(|capability| capability.descriptor())
    }

    /// Number of registered actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Check if the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopCapability {
        descriptor: ActionDescriptor,
    }

    impl NoopCapability {
        fn named(name: &str) -> Arc<dyn Capability> {
            Arc::new(Self {
                descriptor: ActionDescriptor::new(name, "does nothing"),
            })
        }
    }

    #[async_trait::async_trait]
    impl Capability for NoopCapability {
        fn descriptor(&self) -> &ActionDescriptor {
            &self.descriptor
        }

        async fn invoke(&self, _params: &Params, _ctx: &DispatchContext) -> Result<String> {
            Ok("ok".to_string())
        }
    }

    #[test]
    fn test_descriptor_builder() {
        let descriptor = ActionDescriptor::new("list_emails", "List recent inbox messages")
            .with_optional("count")
            .with_ambient(AmbientKey::Mailbox)
            .with_example(
                "check my email",
                serde_json::json!({"action": "list_emails", "parameters": {}}),
            );

        assert_eq!(descriptor.name, "list_emails");
        assert!(descriptor.required_params.is_empty());
        assert_eq!(descriptor.optional_params, vec!["count".to_string()]);
        assert_eq!(descriptor.ambient, vec![AmbientKey::Mailbox]);
        assert_eq!(descriptor.examples.len(), 1);
    }

    #[test]
    fn test_declares_param_includes_ambient_injection() {
        let descriptor = ActionDescriptor::new("create_file_with_visual_context", "")
            .with_required("command")
            .with_ambient(AmbientKey::Transcript);

        assert!(descriptor.declares_param("command"));
        assert!(!descriptor.declares_param("filepath"));
    }

    #[test]
    fn test_lookup_returns_registered_descriptor() {
        let mut registry = ActionRegistry::new();
        registry.register(NoopCapability::named("create_file")).unwrap();

        let capability = registry.lookup("create_file").expect("registered");
        assert_eq!(capability.descriptor().name, "create_file");
        assert!(registry.lookup("does_not_exist").is_none());
    }

    #[test]
    fn test_duplicate_registration_leaves_registry_unchanged() {
        let mut registry = ActionRegistry::new();
        registry.register(NoopCapability::named("read_file")).unwrap();

        let err = registry
            .register(NoopCapability::named("read_file"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateAction(name) if name == "read_file"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.catalog_names(), vec!["read_file"]);
    }

    #[test]
    fn test_catalog_names_preserve_registration_order() {
        let mut registry = ActionRegistry::new();
        for name in ["create_file", "write_to_file", "list_files"] {
            registry.register(NoopCapability::named(name)).unwrap();
        }

        assert_eq!(
            registry.catalog_names(),
            vec!["create_file", "write_to_file", "list_files"]
        );
        let descriptor_order: Vec<&str> =
            registry.descriptors().map(|d| d.name.as_str()).collect();
        assert_eq!(descriptor_order, registry.catalog_names());
    }
}
