//! Prompt construction for command interpretation
//!
//! The allowed-action line and the example set are derived from the
//! registry, never hand-duplicated, so registry changes stay consistent
//! with the prompt. The same registry and transcript always produce the
//! same prompt text.

use crate::registry::ActionRegistry;
use std::fmt::Write;

/// Build the interpretation prompt for one transcript.
#[must_use]
pub fn build_interpret_prompt(transcript: &str, registry: &ActionRegistry) -> String {
    let action_list = registry
        .catalog_names()
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are AURA, a desktop assistant that converts natural language \
         commands into structured JSON objects."
    );
    let _ = writeln!(prompt, "The user said: \"{transcript}\"");
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Create a JSON object with exactly two keys: \"action\" and \"parameters\"."
    );
    let _ = writeln!(prompt, "The \"action\" must be one of: {action_list}.");
    let _ = writeln!(
        prompt,
        "The \"parameters\" object holds the named arguments for that action."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Examples:");
    for descriptor in registry.descriptors() {
        for example in &descriptor.examples {
            let _ = writeln!(prompt, "- \"{}\" -> {}", example.utterance, example.intent);
        }
    }
    let _ = writeln!(prompt);
    let _ = write!(
        prompt,
        "Return only the JSON object, with no other text or explanation."
    );
    prompt
}
