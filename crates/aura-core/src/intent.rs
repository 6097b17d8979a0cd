//! Intent - parsing the model's raw text into a structured request
//!
//! The model is instructed to emit a JSON object with exactly two top-level
//! keys, `action` and `parameters`, but its reply may arrive wrapped in
//! code-fence decoration. Sanitization is a best-effort textual cleanup
//! that tolerates the decoration being absent entirely.

use crate::error::{Error, Result};
use crate::registry::Params;
use serde::{Deserialize, Serialize};

/// Structured request produced from free text.
///
/// An intent is untrusted until validated: `action` may not exist in the
/// registry and `parameters` may be missing required keys or carry unknown
/// ones. Constructed fresh per spoken command, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Name of the requested action
    pub action: String,
    /// Named parameters as extracted by the model
    pub parameters: Params,
}

/// Strip code-fence decoration from a raw model reply.
///
/// Handles triple and single backtick fences with an optional `json`
/// language tag. A reply without decoration passes through unchanged apart
/// from whitespace trimming.
#[must_use]
pub fn sanitize_response(raw: &str) -> String {
    let mut text = raw.trim();
    text = text.trim_matches('`').trim();
    if let (Some(tag), Some(rest)) = (text.get(..4), text.get(4..)) {
        if tag.eq_ignore_ascii_case("json") {
            let rest = rest.trim_start();
            if rest.starts_with('{') {
                text = rest;
            }
        }
    }
    text.to_string()
}

/// Parse sanitized model text into an [`Intent`].
///
/// Fails with [`Error::MalformedResponse`] (carrying the raw text) when the
/// text is not a JSON object, `action` is not a string, or `parameters` is
/// present but not an object. A missing or null `parameters` defaults to an
/// empty map.
pub fn parse_intent(raw: &str) -> Result<Intent> {
    let malformed = || Error::MalformedResponse {
        raw: raw.to_string(),
    };

    let cleaned = sanitize_response(raw);
    let value: serde_json::Value = serde_json::from_str(&cleaned).map_err(|_| malformed())?;
    let object = value.as_object().ok_or_else(malformed)?;

    let action = object
        .get("action")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(malformed)?;

    let parameters = match object.get("parameters") {
        None | Some(serde_json::Value::Null) => Params::new(),
        Some(serde_json::Value::Object(map)) => map.clone(),
        Some(_) => return Err(malformed()),
    };

    Ok(Intent {
        action: action.to_string(),
        parameters,
    })
}
