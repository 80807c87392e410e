//! Google Gemini `generateContent` client.
//!
//! Requests `application/json` output and the standard medium-and-above
//! safety thresholds. Pure parsing in `parse_response` for testability.

use serde::{Deserialize, Serialize};

use super::config::{LlmTimeouts, ProviderSettings};
use super::types::{ChatResponse, ComposedPrompt, LlmChat, LlmError};

const JSON_MIME_TYPE: &str = "application/json";
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        settings: &ProviderSettings,
        timeouts: LlmTimeouts,
    ) -> Result<Self, LlmError> {
        let http = super::http_client(timeouts)?;
        Ok(Self { http, api_key, model: settings.model.clone(), base_url: settings.base_url.clone() })
    }
}

#[async_trait::async_trait]
impl LlmChat for GeminiClient {
    async fn chat(&self, max_tokens: u32, prompt: &ComposedPrompt) -> Result<ChatResponse, LlmError> {
        let body = build_request(max_tokens, prompt);
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text, &self.model)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    system_instruction: SystemInstruction<'a>,
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct SystemInstruction<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

fn build_request(max_tokens: u32, prompt: &ComposedPrompt) -> ApiRequest<'_> {
    ApiRequest {
        system_instruction: SystemInstruction { parts: [RequestPart { text: &prompt.system }] },
        contents: [RequestContent { role: "user", parts: [RequestPart { text: &prompt.user }] }],
        generation_config: GenerationConfig { response_mime_type: JSON_MIME_TYPE, max_output_tokens: max_tokens },
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|&category| SafetySetting { category, threshold: SAFETY_THRESHOLD })
            .collect(),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str, requested_model: &str) -> Result<ChatResponse, LlmError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(candidate) = api.candidates.into_iter().next() else {
        let reason = api
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return Err(LlmError::ApiParse(format!("generateContent: prompt blocked ({reason})")));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(LlmError::ApiParse(format!("generateContent: empty candidate (finish {reason})")));
    }

    let stop_reason = match candidate.finish_reason.as_deref() {
        Some("MAX_TOKENS") => "max_tokens",
        _ => "end_turn",
    };
    let (input_tokens, output_tokens) = api
        .usage_metadata
        .map_or((0, 0), |u| (u.prompt_token_count, u.candidates_token_count));

    Ok(ChatResponse {
        text,
        model: api.model_version.unwrap_or_else(|| requested_model.to_string()),
        stop_reason: stop_reason.to_string(),
        input_tokens,
        output_tokens,
    })
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
