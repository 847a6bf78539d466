//! Google Gemini provider implementation
//!
//! Implements [`LLMProvider`] against the Generative Language REST API.
//! See: https://ai.google.dev/api/generate-content
//!
//! # Example
//!
//! ```no_run
//! use brief_llm::{CompletionRequest, LLMProvider, Message, ModelSelector};
//! use brief_llm::providers::GeminiProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = GeminiProvider::from_env()?;
//!
//!     // Let the account's available models decide
//!     let model = ModelSelector::default().discover(&provider).await?;
//!
//!     let request = CompletionRequest::builder(model)
//!         .add_message(Message::user("Say hello"))
//!         .max_tokens(64)
//!         .build();
//!
//!     let response = provider.complete(request).await?;
//!     println!("{}", response.message.text());
//!     Ok(())
//! }
//! ```

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, ModelInfo, Result,
    Role, StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const GENERATE_METHOD: &str = "generateContent";
const LIST_PAGE_SIZE: u32 = 100;

/// Configuration for the Gemini provider
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: String,

    /// Base URL (default: "https://generativelanguage.googleapis.com/v1beta")
    pub api_base: String,

    /// Request timeout (default: 120 s)
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Config with the given key and default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the key from `GEMINI_API_KEY`, falling back to `GOOGLE_API_KEY`
    pub fn from_env() -> Result<Self> {
        let api_key = ["GEMINI_API_KEY", "GOOGLE_API_KEY"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                LLMError::ConfigurationError(
                    "GEMINI_API_KEY environment variable not set".to_string(),
                )
            })?;

        Ok(Self::new(api_key.trim()))
    }

    /// Override the API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Gemini provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a provider with custom configuration
    pub fn with_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "Gemini API key is empty".to_string(),
            ));
        }

        if config.timeout.is_zero() {
            return Err(LLMError::ConfigurationError(
                "Gemini request timeout must be greater than zero".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a provider with an API key and default settings
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(GeminiConfig::new(api_key))
    }

    /// Create a provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::with_config(GeminiConfig::from_env()?)
    }

    /// Get the current configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/{}:{GENERATE_METHOD}",
            self.config.api_base,
            model_path(model)
        )
    }
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        debug!("Sending request to Gemini API");

        let model = request.model.clone();
        let gemini_request = build_request(request);

        let response = self
            .client
            .post(self.generate_url(&model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&gemini_request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(map_error_status(status, error_text, &model));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        parse_response(gemini_response)
    }

    #[instrument(skip(self))]
    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(format!("{}/models", self.config.api_base))
                .header("x-goog-api-key", &self.config.api_key)
                .query(&query)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let error_text = response.text().await?;
                return Err(map_error_status(status, error_text, "models"));
            }

            let page: ListModelsResponse = response.json().await.map_err(|e| {
                LLMError::UnexpectedResponse(format!("Failed to parse model list: {e}"))
            })?;

            models.extend(page.models.into_iter().map(ModelInfo::from));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Listed {} Gemini models", models.len());
        Ok(models)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// `gemini-1.5-flash` and `models/gemini-1.5-flash` both address the same model
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

fn map_error_status(status: u16, error_text: String, model: &str) -> LLMError {
    match status {
        401 | 403 => LLMError::AuthenticationFailed,
        // Gemini reports a bad key as 400 INVALID_ARGUMENT
        400 if error_text.contains("API_KEY_INVALID") => LLMError::AuthenticationFailed,
        400 => LLMError::InvalidRequest(error_text),
        404 => LLMError::ModelNotFound(model.to_string()),
        429 => LLMError::RateLimitExceeded(error_text),
        _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
    }
}

fn build_request(request: CompletionRequest) -> GeminiRequest {
    let contents = request
        .messages
        .into_iter()
        .map(|message| GeminiContent {
            role: Some(
                match message.role {
                    Role::User => "user",
                    Role::Assistant => "model",
                }
                .to_string(),
            ),
            parts: vec![GeminiPart {
                text: Some(message.content),
            }],
        })
        .collect();

    GeminiRequest {
        contents,
        generation_config: GenerationConfig {
            max_output_tokens: request.max_tokens,
            temperature: request.temperature,
        },
    }
}

fn parse_response(response: GeminiResponse) -> Result<CompletionResponse> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map_or_else(
                || "no candidates in response".to_string(),
                |reason| format!("prompt blocked ({reason})"),
            );
        return Err(LLMError::EmptyResponse(reason));
    };

    let finish_reason = candidate.finish_reason.unwrap_or_default();
    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LLMError::EmptyResponse(format!(
            "no text returned (finish reason: {})",
            if finish_reason.is_empty() { "unknown" } else { finish_reason.as_str() }
        )));
    }

    let usage = response
        .usage_metadata
        .map(|u| TokenUsage {
            input_tokens: u.prompt_token_count,
            output_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    debug!(
        "Received response - finish_reason: {}, tokens: {}/{}",
        finish_reason, usage.input_tokens, usage.output_tokens
    );

    Ok(CompletionResponse {
        message: Message::assistant(text),
        stop_reason: map_finish_reason(&finish_reason),
        usage,
    })
}

fn map_finish_reason(reason: &str) -> StopReason {
    match reason {
        "MAX_TOKENS" => StopReason::MaxTokens,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            StopReason::Blocked
        }
        "STOP" | "" => StopReason::EndTurn,
        other => {
            debug!("Unknown finish reason: {}", other);
            StopReason::EndTurn
        }
    }
}

// Gemini-specific request/response types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<GeminiModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModel {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl From<GeminiModel> for ModelInfo {
    fn from(model: GeminiModel) -> Self {
        let supports_generation = model
            .supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_METHOD);

        ModelInfo {
            id: model
                .name
                .strip_prefix("models/")
                .unwrap_or(&model.name)
                .to_string(),
            display_name: model.display_name,
            supports_generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key").unwrap();
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.config().api_base, DEFAULT_GEMINI_API_BASE);
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(matches!(
            GeminiProvider::new("  "),
            Err(LLMError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_generate_url() {
        let provider = GeminiProvider::with_config(
            GeminiConfig::new("k").with_api_base("http://localhost:8080/v1beta/"),
        )
        .unwrap();

        assert_eq!(
            provider.generate_url("gemini-1.5-flash"),
            "http://localhost:8080/v1beta/models/gemini-1.5-flash:generateContent"
        );
        assert_eq!(
            provider.generate_url("models/gemini-pro"),
            "http://localhost:8080/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_sub_second_timeout_kept() {
        let config = GeminiConfig::new("k").with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert!(GeminiProvider::with_config(config).is_ok());

        let zero = GeminiConfig::new("k").with_timeout(Duration::ZERO);
        assert!(matches!(
            GeminiProvider::with_config(zero),
            Err(LLMError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", GeminiConfig::new("secret-key"));
        assert!(!debug.contains("secret-key"));
    }

    #[test]
    fn test_request_serialization() {
        let request = CompletionRequest::builder("gemini-1.5-flash")
            .add_message(Message::user("分析 2330"))
            .max_tokens(512)
            .temperature(0.3)
            .build();

        let body = serde_json::to_value(build_request(request)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "分析 2330");
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 512);
        assert!(body["generationConfig"].get("stopSequences").is_none());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let raw = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "## 摘要\n" }, { "text": "看多" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 120, "candidatesTokenCount": 30, "totalTokenCount": 150 }
        });

        let response = parse_response(serde_json::from_value(raw).unwrap()).unwrap();
        assert_eq!(response.message.text(), "## 摘要\n看多");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.total(), 150);
    }

    #[test]
    fn test_parse_response_blocked_prompt() {
        let raw = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        let err = parse_response(serde_json::from_value(raw).unwrap()).unwrap_err();
        assert!(err.to_string().contains("prompt blocked (SAFETY)"));
    }

    #[test]
    fn test_parse_response_without_text() {
        let raw = json!({
            "candidates": [{ "content": { "parts": [] }, "finishReason": "SAFETY" }]
        });
        let err = parse_response(serde_json::from_value(raw).unwrap()).unwrap_err();
        assert!(matches!(err, LLMError::EmptyResponse(ref msg) if msg.contains("SAFETY")));
    }

    #[test]
    fn test_error_status_mapping() {
        assert!(matches!(
            map_error_status(400, "API_KEY_INVALID".into(), "m"),
            LLMError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(429, "quota".into(), "m"),
            LLMError::RateLimitExceeded(_)
        ));
        assert!(matches!(
            map_error_status(404, String::new(), "gemini-x"),
            LLMError::ModelNotFound(ref m) if m == "gemini-x"
        ));
        assert!(matches!(
            map_error_status(503, "overloaded".into(), "m"),
            LLMError::RequestFailed(ref m) if m.contains("503")
        ));
    }

    #[test]
    fn test_model_listing_conversion() {
        let raw = json!({
            "models": [
                {
                    "name": "models/gemini-1.5-flash",
                    "displayName": "Gemini 1.5 Flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/text-embedding-004",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ],
            "nextPageToken": ""
        });

        let page: ListModelsResponse = serde_json::from_value(raw).unwrap();
        let models: Vec<ModelInfo> = page.models.into_iter().map(ModelInfo::from).collect();

        assert_eq!(models[0].id, "gemini-1.5-flash");
        assert!(models[0].supports_generation);
        assert_eq!(models[0].display_name.as_deref(), Some("Gemini 1.5 Flash"));
        assert!(!models[1].supports_generation);
    }

    #[tokio::test]
    #[ignore] // Requires network access and GEMINI_API_KEY
    async fn test_live_discovery() {
        let provider = GeminiProvider::from_env().unwrap();
        let model = crate::ModelSelector::default().discover(&provider).await.unwrap();
        assert!(!model.is_empty());
    }
}
