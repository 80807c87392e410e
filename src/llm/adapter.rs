//! Provider adapter — one backend behind the `prompt → JSON string` contract.
//!
//! DESIGN
//! ======
//! An adapter is a provider kind plus an optional backend client. The client
//! is only constructed when the provider's credential is configured, so an
//! adapter without one answers with the "not configured" envelope and never
//! touches the network. Backend errors stop here: they are logged and
//! replaced by a generic envelope naming the provider.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::config::ProviderKind;
use super::envelope::error_json;
use super::quirks;
use super::types::{ComposedPrompt, LlmChat, LlmError};

pub struct ProviderAdapter {
    kind: ProviderKind,
    backend: Option<Arc<dyn LlmChat>>,
    max_tokens: u32,
}

impl ProviderAdapter {
    /// An adapter whose credential is absent.
    #[must_use]
    pub fn unconfigured(kind: ProviderKind, max_tokens: u32) -> Self {
        Self { kind, backend: None, max_tokens }
    }

    #[must_use]
    pub fn new(kind: ProviderKind, backend: Arc<dyn LlmChat>, max_tokens: u32) -> Self {
        Self { kind, backend: Some(backend), max_tokens }
    }

    #[must_use]
    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Send `prompt` to the backend and return its completion text, or a
    /// JSON failure envelope. Never returns an `Err` and never panics on
    /// backend failure.
    pub async fn invoke(&self, prompt: &ComposedPrompt) -> String {
        let provider = self.kind.key();
        let Some(backend) = &self.backend else {
            warn!(provider, "llm: provider called without a configured API key");
            return not_configured_json(self.kind);
        };

        match backend.chat(self.max_tokens, prompt).await {
            Ok(response) => {
                info!(
                    provider,
                    model = %response.model,
                    stop_reason = %response.stop_reason,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "llm: completion received"
                );
                quirks::normalize(self.kind, response.text)
            }
            Err(e) => {
                error!(provider, code = e.error_code(), error = %e, "llm: provider call failed");
                if let LlmError::ApiResponse { body, .. } = &e {
                    error!(provider, body = %body, "llm: provider error body");
                }
                call_failed_json(self.kind)
            }
        }
    }
}

/// `{"error":"<Provider> API key is not configured"}`, Claude reads "Anthropic Claude".
#[must_use]
pub fn not_configured_json(kind: ProviderKind) -> String {
    error_json(format!("{} API key is not configured", kind.credential_name()))
}

/// `{"error":"Could not get a response from the <Provider> API. Please check the server console."}`
#[must_use]
pub fn call_failed_json(kind: ProviderKind) -> String {
    error_json(format!(
        "Could not get a response from the {} API. Please check the server console.",
        kind.display_name()
    ))
}

#[cfg(test)]
#[path = "adapter_test.rs"]
mod tests;
