//! LLM types — provider-neutral prompt, response, and error types.
//!
//! Shared by the Gemini, `OpenAI`, and Claude clients and by the adapter
//! layer that turns their results into JSON envelopes.

use serde::Serialize;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
///
/// These never cross the adapter boundary: [`super::adapter::ProviderAdapter`]
/// logs them and returns the generic failure envelope instead.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The HTTP request to the LLM provider failed (transport, timeout).
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized, or held no text.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// Short grepable code for log lines.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }
}

// =============================================================================
// COMPOSED PROMPT
// =============================================================================

/// The instruction built once per refinement request.
///
/// Kept as two fields so every backend can place them in its native system
/// and user slots without re-parsing a combined string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedPrompt {
    /// Role framing and output-contract directive.
    pub system: String,
    /// Phrases, task fragments, and the expected key list.
    pub user: String,
}

impl ComposedPrompt {
    /// Single-string form with `SYSTEM:` / `USER:` markers, for display only.
    #[must_use]
    pub fn render(&self) -> String {
        format!("SYSTEM: {}\n\nUSER: {}", self.system, self.user)
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Text completion extracted from a provider response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: String,
    pub model: String,
    pub stop_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for one completion. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send the composed prompt to the provider and return its text completion.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails, the provider answers
    /// with a non-success status, or the response carries no text.
    async fn chat(&self, max_tokens: u32, prompt: &ComposedPrompt) -> Result<ChatResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
