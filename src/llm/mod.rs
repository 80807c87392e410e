//! LLM — provider routing and the prompt contract.
//!
//! DESIGN
//! ======
//! A refinement is one prompt sent to one provider. `ProviderRouter` holds
//! one [`adapter::ProviderAdapter`] per [`ProviderKind`] and picks it by
//! exhaustive match; string keys from callers are parsed at the edge, and
//! anything unrecognized becomes the "unsupported provider" envelope.
//! Credentials are read once at startup and injected into the backend
//! clients; a provider without one stays registered but unconfigured.

pub mod adapter;
pub mod anthropic;
pub mod config;
pub mod envelope;
pub mod gemini;
pub mod openai;
pub mod prompt;
pub mod quirks;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::catalog::TaskEntry;
use adapter::ProviderAdapter;
pub use config::{LlmConfig, ProviderKind};
use config::LlmTimeouts;
pub use envelope::{ErrorEnvelope, Refinement};
pub use types::{ComposedPrompt, LlmChat, LlmError};

// =============================================================================
// ROUTER
// =============================================================================

pub struct ProviderRouter {
    gemini: ProviderAdapter,
    openai: ProviderAdapter,
    claude: ProviderAdapter,
    max_tokens: u32,
}

/// One row of the provider listing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProviderStatus {
    pub id: &'static str,
    pub label: &'static str,
    pub configured: bool,
}

impl ProviderRouter {
    /// A router where every provider is unconfigured.
    #[must_use]
    pub fn new(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            gemini: ProviderAdapter::unconfigured(ProviderKind::Gemini, max_tokens),
            openai: ProviderAdapter::unconfigured(ProviderKind::OpenAi, max_tokens),
            claude: ProviderAdapter::unconfigured(ProviderKind::Claude, max_tokens),
        }
    }

    /// Build the router from environment variables (see [`LlmConfig::from_env`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the config is malformed or an HTTP client fails to build.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(&config)
    }

    /// Build the router from a parsed typed config. Providers without a
    /// credential are left unconfigured.
    ///
    /// # Errors
    ///
    /// Returns an error if a provider HTTP client fails to build.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut router = Self::new(config.max_tokens);

        if let Some(key) = &config.gemini.api_key {
            let client = gemini::GeminiClient::new(key.clone(), &config.gemini, config.timeouts)?;
            router = router.with_backend(ProviderKind::Gemini, Arc::new(client));
        }
        if let Some(key) = &config.openai.api_key {
            let client = openai::OpenAiClient::new(key.clone(), &config.openai, config.openai_mode, config.timeouts)?;
            router = router.with_backend(ProviderKind::OpenAi, Arc::new(client));
        }
        if let Some(key) = &config.claude.api_key {
            let client = anthropic::AnthropicClient::new(key.clone(), &config.claude, config.timeouts)?;
            router = router.with_backend(ProviderKind::Claude, Arc::new(client));
        }

        Ok(router)
    }

    /// Replace the adapter for `kind` with one backed by `backend`, using the
    /// router's output token ceiling.
    #[must_use]
    pub fn with_backend(mut self, kind: ProviderKind, backend: Arc<dyn LlmChat>) -> Self {
        *self.adapter_mut(kind) = ProviderAdapter::new(kind, backend, self.max_tokens);
        self
    }

    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    #[must_use]
    pub fn adapter(&self, kind: ProviderKind) -> &ProviderAdapter {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Claude => &self.claude,
        }
    }

    fn adapter_mut(&mut self, kind: ProviderKind) -> &mut ProviderAdapter {
        match kind {
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::OpenAi => &mut self.openai,
            ProviderKind::Claude => &mut self.claude,
        }
    }

    /// Every provider with its configured flag, in picker order.
    #[must_use]
    pub fn providers(&self) -> Vec<ProviderStatus> {
        ProviderKind::ALL
            .iter()
            .map(|&kind| ProviderStatus {
                id: kind.key(),
                label: kind.label(),
                configured: self.adapter(kind).is_configured(),
            })
            .collect()
    }

    /// Route `prompt` to the provider named by `provider_key`.
    ///
    /// Returns the adapter's result unmodified, or
    /// `{"error":"Unsupported LLM provider: <key>"}` for an unknown key.
    pub async fn dispatch(&self, provider_key: &str, prompt: &ComposedPrompt) -> String {
        let Ok(kind) = provider_key.parse::<ProviderKind>() else {
            warn!(provider = provider_key, "llm: unsupported provider requested");
            return unsupported_provider_json(provider_key);
        };
        self.adapter(kind).invoke(prompt).await
    }

    /// Build the prompt and dispatch it in one call.
    pub async fn refine<P, T>(
        &self,
        provider_key: &str,
        phrases: &[P],
        selected_task_ids: &[T],
        catalog: &[TaskEntry],
    ) -> String
    where
        P: AsRef<str> + Sync,
        T: AsRef<str> + Sync,
    {
        let prompt = prompt::build_prompt(phrases, selected_task_ids, catalog);
        self.dispatch(provider_key, &prompt).await
    }
}

/// `{"error":"Unsupported LLM provider: <key>"}`
#[must_use]
pub fn unsupported_provider_json(provider_key: &str) -> String {
    envelope::error_json(format!("Unsupported LLM provider: {provider_key}"))
}

/// HTTP client shared by the provider clients' construction path.
pub(crate) fn http_client(timeouts: LlmTimeouts) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeouts.request_secs))
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .build()
        .map_err(|e| LlmError::HttpClientBuild(e.to_string()))
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
