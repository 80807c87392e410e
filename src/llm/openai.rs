//! OpenAI-compatible API client.
//!
//! Supports both `/v1/chat/completions` and `/v1/responses`. Either way the
//! request asks for JSON-object output; the model may still ignore it.

use serde::{Deserialize, Serialize};

use super::config::{LlmTimeouts, OpenAiApiMode, ProviderSettings};
use super::types::{ChatResponse, ComposedPrompt, LlmChat, LlmError};

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    mode: OpenAiApiMode,
}

impl OpenAiClient {
    /// # Errors
    ///
    /// Returns [`LlmError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(
        api_key: String,
        settings: &ProviderSettings,
        mode: OpenAiApiMode,
        timeouts: LlmTimeouts,
    ) -> Result<Self, LlmError> {
        let http = super::http_client(timeouts)?;
        Ok(Self { http, api_key, model: settings.model.clone(), base_url: settings.base_url.clone(), mode })
    }

    async fn chat_completions(&self, max_tokens: u32, prompt: &ComposedPrompt) -> Result<ChatResponse, LlmError> {
        let messages = build_chat_completions_messages(prompt);
        let body = CcRequest {
            model: &self.model,
            max_tokens,
            messages: &messages,
            response_format: ResponseFormat::JSON_OBJECT,
        };
        let text = self.send_json("/chat/completions", &body).await?;
        parse_chat_completions_response(&text)
    }

    async fn responses(&self, max_tokens: u32, prompt: &ComposedPrompt) -> Result<ChatResponse, LlmError> {
        let input = [RespInputItem::user(&prompt.user)];
        let body = RespRequest {
            model: &self.model,
            max_output_tokens: max_tokens,
            instructions: &prompt.system,
            input: &input,
            text: RespTextConfig { format: ResponseFormat::JSON_OBJECT },
        };
        let text = self.send_json("/responses", &body).await?;
        parse_responses_response(&text)
    }

    async fn send_json(&self, path: &str, body: &impl Serialize) -> Result<String, LlmError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
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
        Ok(text)
    }
}

#[async_trait::async_trait]
impl LlmChat for OpenAiClient {
    async fn chat(&self, max_tokens: u32, prompt: &ComposedPrompt) -> Result<ChatResponse, LlmError> {
        match self.mode {
            OpenAiApiMode::ChatCompletions => self.chat_completions(max_tokens, prompt).await,
            OpenAiApiMode::Responses => self.responses(max_tokens, prompt).await,
        }
    }
}

// =============================================================================
// SHARED WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

impl ResponseFormat {
    const JSON_OBJECT: Self = Self { format_type: "json_object" };
}

// =============================================================================
// CHAT COMPLETIONS WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CcRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [CcMessage<'a>],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct CcMessage<'a> {
    role: &'static str,
    content: &'a str,
}

fn build_chat_completions_messages(prompt: &ComposedPrompt) -> Vec<CcMessage<'_>> {
    let mut out = Vec::with_capacity(2);
    if !prompt.system.trim().is_empty() {
        out.push(CcMessage { role: "system", content: &prompt.system });
    }
    out.push(CcMessage { role: "user", content: &prompt.user });
    out
}

// =============================================================================
// RESPONSES WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct RespRequest<'a> {
    model: &'a str,
    max_output_tokens: u32,
    instructions: &'a str,
    input: &'a [RespInputItem<'a>],
    text: RespTextConfig,
}

#[derive(Serialize)]
struct RespTextConfig {
    format: ResponseFormat,
}

#[derive(Serialize)]
struct RespInputItem<'a> {
    #[serde(rename = "type")]
    item_type: &'static str,
    role: &'static str,
    content: [RespTextContent<'a>; 1],
}

impl<'a> RespInputItem<'a> {
    fn user(text: &'a str) -> Self {
        Self { item_type: "message", role: "user", content: [RespTextContent { content_type: "input_text", text }] }
    }
}

#[derive(Serialize)]
struct RespTextContent<'a> {
    #[serde(rename = "type")]
    content_type: &'static str,
    text: &'a str,
}

// =============================================================================
// RESPONSE PARSING
// =============================================================================

#[derive(Deserialize)]
struct CcResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<CcChoice>,
    usage: Option<CcUsage>,
}

#[derive(Deserialize)]
struct CcChoice {
    message: Option<CcResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CcResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct CcUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

pub(crate) fn parse_chat_completions_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let api: CcResponse = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let choice = api
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::ApiParse("chat_completions: missing choices[0]".to_string()))?;
    let text = choice
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| LlmError::ApiParse("chat_completions: choices[0] has no message content".to_string()))?;

    let stop_reason = match choice.finish_reason.as_deref() {
        Some("length") => "max_tokens",
        _ => "end_turn",
    };
    let (input_tokens, output_tokens) = api
        .usage
        .map_or((0, 0), |u| (u.prompt_tokens, u.completion_tokens));

    Ok(ChatResponse { text, model: api.model, stop_reason: stop_reason.to_string(), input_tokens, output_tokens })
}

#[derive(Deserialize)]
struct RespResponse {
    #[serde(default)]
    model: String,
    output: Option<Vec<RespOutputItem>>,
    output_text: Option<String>,
    incomplete_details: Option<RespIncomplete>,
    usage: Option<RespUsage>,
}

#[derive(Deserialize)]
struct RespOutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<RespOutputPart>,
}

#[derive(Deserialize)]
struct RespOutputPart {
    #[serde(rename = "type")]
    part_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct RespIncomplete {
    reason: Option<String>,
}

#[derive(Deserialize)]
struct RespUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

pub(crate) fn parse_responses_response(json_text: &str) -> Result<ChatResponse, LlmError> {
    let api: RespResponse = serde_json::from_str(json_text).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    // Reasoning and tool items carry no completion text.
    let text: String = match api.output {
        Some(items) => items
            .into_iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content)
            .filter(|part| matches!(part.part_type.as_str(), "output_text" | "text"))
            .filter_map(|part| part.text)
            .collect(),
        None => api.output_text.unwrap_or_default(),
    };
    if text.is_empty() {
        return Err(LlmError::ApiParse("responses: no output text".to_string()));
    }

    let truncated = api
        .incomplete_details
        .and_then(|d| d.reason)
        .is_some_and(|reason| reason == "max_output_tokens");
    let (input_tokens, output_tokens) = api
        .usage
        .map_or((0, 0), |u| (u.input_tokens, u.output_tokens));

    Ok(ChatResponse {
        text,
        model: api.model,
        stop_reason: if truncated { "max_tokens" } else { "end_turn" }.to_string(),
        input_tokens,
        output_tokens,
    })
}

#[cfg(test)]
#[path = "openai_test.rs"]
mod tests;
