//! JSON envelopes — the one contract every provider path returns.
//!
//! Success is a JSON object keyed by task id. Failure is
//! `{"error": "...", "rawResponse"?: "..."}`. Adapters hand back strings;
//! [`Refinement::parse`] is the caller's side of the contract.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Substituted when a provider result is not a JSON object.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse the response from the AI.";

// =============================================================================
// ERROR ENVELOPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(rename = "rawResponse", default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), raw_response: None }
    }

    #[must_use]
    pub fn with_raw(error: impl Into<String>, raw: impl Into<String>) -> Self {
        Self { error: error.into(), raw_response: Some(raw.into()) }
    }

    /// Compact JSON text, e.g. `{"error":"..."}`.
    #[must_use]
    pub fn to_json(&self) -> String {
        let mut map = Map::new();
        map.insert("error".into(), Value::String(self.error.clone()));
        if let Some(raw) = &self.raw_response {
            map.insert("rawResponse".into(), Value::String(raw.clone()));
        }
        Value::Object(map).to_string()
    }
}

/// Failure envelope text for a bare message.
#[must_use]
pub fn error_json(message: impl Into<String>) -> String {
    ErrorEnvelope::new(message).to_json()
}

// =============================================================================
// REFINEMENT
// =============================================================================

/// A provider result after the caller has parsed it.
///
/// Serializes back to exactly the output contract: the analysis object, or
/// the error envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Refinement {
    Failed(ErrorEnvelope),
    Analysis(Map<String, Value>),
}

impl Refinement {
    /// Parse a provider result string.
    ///
    /// An object with a string `error` key is a failure envelope. Any other
    /// object is an analysis. Text that is not JSON, or JSON that is not an
    /// object, becomes the parse-failure envelope carrying the raw text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => match map.get("error").and_then(Value::as_str) {
                Some(error) => Self::Failed(ErrorEnvelope {
                    error: error.to_owned(),
                    raw_response: map
                        .get("rawResponse")
                        .and_then(Value::as_str)
                        .map(str::to_owned),
                }),
                None => Self::Analysis(map),
            },
            Ok(other) => {
                warn!(kind = json_kind(&other), "llm: result is JSON but not an object");
                Self::Failed(ErrorEnvelope::with_raw(PARSE_FAILURE_MESSAGE, raw))
            }
            Err(e) => {
                warn!(error = %e, raw_len = raw.len(), "llm: result is not valid JSON");
                Self::Failed(ErrorEnvelope::with_raw(PARSE_FAILURE_MESSAGE, raw))
            }
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Analysis sections as `(task id, Markdown)` pairs, in response order.
    /// Non-string values are rendered as their JSON text.
    #[must_use]
    pub fn sections(&self) -> Vec<(&str, String)> {
        match self {
            Self::Failed(_) => Vec::new(),
            Self::Analysis(map) => map
                .iter()
                .map(|(key, value)| {
                    let text = value
                        .as_str()
                        .map_or_else(|| value.to_string(), str::to_owned);
                    (key.as_str(), text)
                })
                .collect(),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
