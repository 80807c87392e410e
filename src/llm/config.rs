//! LLM configuration parsed from environment variables.

use std::str::FromStr;

use super::types::LlmError;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_CLAUDE_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_LLM_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// PROVIDER KIND
// =============================================================================

/// The closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
    Claude,
}

impl ProviderKind {
    pub const ALL: [Self; 3] = [Self::Gemini, Self::OpenAi, Self::Claude];

    /// Routing key accepted from callers.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Claude => "claude",
        }
    }

    /// Short name used inside error envelopes.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
            Self::Claude => "Claude",
        }
    }

    /// Name used in the missing-credential envelope.
    #[must_use]
    pub fn credential_name(self) -> &'static str {
        match self {
            Self::Gemini => "Gemini",
            Self::OpenAi => "OpenAI",
            Self::Claude => "Anthropic Claude",
        }
    }

    /// Label shown in provider pickers.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gemini => "Google Gemini",
            Self::OpenAi => "OpenAI GPT",
            Self::Claude => "Anthropic Claude",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gemini" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "claude" => Ok(Self::Claude),
            other => Err(LlmError::ConfigParse(format!("unknown provider: {other}"))),
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAiApiMode {
    ChatCompletions,
    Responses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Per-backend settings. `api_key == None` leaves the provider disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub gemini: ProviderSettings,
    pub openai: ProviderSettings,
    pub claude: ProviderSettings,
    pub openai_mode: OpenAiApiMode,
    pub max_tokens: u32,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Credentials (each optional, empty counts as unset):
    /// - `GEMINI_API_KEY`, `OPENAI_API_KEY`, `CLAUDE_API_KEY`
    ///
    /// Optional:
    /// - `GEMINI_MODEL`, `OPENAI_MODEL`, `CLAUDE_MODEL`: provider defaults when absent
    /// - `GEMINI_BASE_URL`, `OPENAI_BASE_URL`, `CLAUDE_BASE_URL`
    /// - `OPENAI_API_MODE`: `chat_completions` (default) or `responses`
    /// - `LLM_MAX_TOKENS`: default 4096
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigParse`] for an unrecognized `OPENAI_API_MODE`.
    pub fn from_env() -> Result<Self, LlmError> {
        let openai_mode = parse_openai_mode(std::env::var("OPENAI_API_MODE").ok().as_deref())?;

        Ok(Self {
            gemini: provider_settings(ProviderKind::Gemini),
            openai: provider_settings(ProviderKind::OpenAi),
            claude: provider_settings(ProviderKind::Claude),
            openai_mode,
            max_tokens: env_parse("LLM_MAX_TOKENS", DEFAULT_LLM_MAX_TOKENS),
            timeouts: LlmTimeouts {
                request_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
            },
        })
    }

    /// Settings for one provider.
    #[must_use]
    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Claude => &self.claude,
        }
    }
}

impl Default for LlmConfig {
    /// No credentials, stock models and endpoints.
    fn default() -> Self {
        let settings = |kind| ProviderSettings {
            api_key: None,
            model: default_model(kind).to_string(),
            base_url: default_base_url(kind).to_string(),
        };
        Self {
            gemini: settings(ProviderKind::Gemini),
            openai: settings(ProviderKind::OpenAi),
            claude: settings(ProviderKind::Claude),
            openai_mode: OpenAiApiMode::ChatCompletions,
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
            timeouts: LlmTimeouts {
                request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS,
            },
        }
    }
}

fn provider_settings(kind: ProviderKind) -> ProviderSettings {
    let prefix = env_prefix(kind);
    let api_key = std::env::var(format!("{prefix}_API_KEY"))
        .ok()
        .filter(|key| !key.trim().is_empty());
    let model = std::env::var(format!("{prefix}_MODEL")).unwrap_or_else(|_| default_model(kind).to_string());
    let base_url = std::env::var(format!("{prefix}_BASE_URL"))
        .unwrap_or_else(|_| default_base_url(kind).to_string())
        .trim_end_matches('/')
        .to_string();
    ProviderSettings { api_key, model, base_url }
}

fn env_prefix(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => "GEMINI",
        ProviderKind::OpenAi => "OPENAI",
        ProviderKind::Claude => "CLAUDE",
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_openai_mode(raw: Option<&str>) -> Result<OpenAiApiMode, LlmError> {
    match raw.unwrap_or("chat_completions") {
        "chat_completions" => Ok(OpenAiApiMode::ChatCompletions),
        "responses" => Ok(OpenAiApiMode::Responses),
        other => Err(LlmError::ConfigParse(format!(
            "unsupported openai_api mode '{other}' (expected 'chat_completions' or 'responses')"
        ))),
    }
}

fn default_model(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => "gemini-1.5-flash",
        ProviderKind::OpenAi => "gpt-4o",
        ProviderKind::Claude => "claude-sonnet-4-20250514",
    }
}

fn default_base_url(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => DEFAULT_GEMINI_BASE_URL,
        ProviderKind::OpenAi => DEFAULT_OPENAI_BASE_URL,
        ProviderKind::Claude => DEFAULT_CLAUDE_BASE_URL,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
