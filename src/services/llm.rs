use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Keys starting with this prefix are template values copied from the
/// sample config and never sent to a backend.
pub const PLACEHOLDER_PREFIX: &str = "your_";

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_provider")]
    pub provider: String, // "openai" or "gemini"
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_timeout() -> u64 {
    60
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: None,
            model: None,
            base_url: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl LlmConfig {
    pub fn api_key_env(&self) -> &'static str {
        match self.provider.as_str() {
            "gemini" => "GEMINI_API_KEY",
            _ => "OPENAI_API_KEY",
        }
    }

    pub fn model(&self) -> &str {
        match (self.model.as_deref(), self.provider.as_str()) {
            (Some(model), _) => model,
            (None, "gemini") => "gemini-2.0-flash",
            (None, _) => "gpt-4o-mini",
        }
    }

    /// Returns the API key when one is usable. Absent, blank and
    /// placeholder keys all count as missing.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty() && !k.starts_with(PLACEHOLDER_PREFIX))
    }
}

/// Why a backend call produced no text.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Request timed out")]
    Timeout,
    #[error("Authentication rejected: {1} (Status {0})")]
    Auth(StatusCode, String),
    #[error("Rate limited: {0}")]
    RateLimited(String),
    #[error("Status error: {1} (Status {0})")]
    Status(StatusCode, String),
    #[error("Transport error: {0}")]
    Transport(reqwest::Error),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Empty response: {0}")]
    Empty(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if e.is_decode() {
            BackendError::Malformed(e.to_string())
        } else {
            BackendError::Transport(e)
        }
    }
}

impl BackendError {
    fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Auth(status, body),
            StatusCode::TOO_MANY_REQUESTS => BackendError::RateLimited(body),
            _ => BackendError::Status(status, body),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

// Sampling is left wide open and unpenalised.
const TOP_P: f32 = 1.0;
const FREQUENCY_PENALTY: f32 = 0.0;
const PRESENCE_PENALTY: f32 = 0.0;

#[async_trait]
pub trait LlmClient: Send + Sync + Debug {
    async fn complete(
        &self,
        prompt: &str,
        params: &CompletionParams,
    ) -> Result<String, BackendError>;
}

pub fn create_llm(config: &LlmConfig, api_key: &str) -> Result<Box<dyn LlmClient>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .context("Failed to build HTTP client")?;

    match config.provider.as_str() {
        "openai" => {
            let base_url = resolve_base_url(config.base_url.as_deref(), OPENAI_BASE_URL)?;
            Ok(Box::new(OpenAIClient::new(client, api_key, config.model(), &base_url)))
        }
        "gemini" => {
            let base_url = resolve_base_url(config.base_url.as_deref(), GEMINI_BASE_URL)?;
            Ok(Box::new(GeminiClient::new(client, api_key, config.model(), &base_url)))
        }
        _ => Err(anyhow!("Unknown LLM provider: {}", config.provider)),
    }
}

fn resolve_base_url(configured: Option<&str>, default: &str) -> Result<String> {
    let raw = configured.unwrap_or(default);
    let url = Url::parse(raw).with_context(|| format!("Invalid base_url: {}", raw))?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

async fn read_body(resp: reqwest::Response) -> Result<String, BackendError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(BackendError::from_status(status, body));
    }
    Ok(body)
}

// --- OpenAI ---

#[derive(Debug)]
struct OpenAIClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    fn new(client: reqwest::Client, api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.to_string(),
            client,
        }
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessageResponse,
}

#[derive(Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(
        &self,
        prompt: &str,
        params: &CompletionParams,
    ) -> Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: TOP_P,
            frequency_penalty: FREQUENCY_PENALTY,
            presence_penalty: PRESENCE_PENALTY,
        };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let body = read_body(resp).await?;
        let result: OpenAIResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::Malformed(format!("{}. Body: {}", e, body)))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BackendError::Empty("OpenAI response missing content".to_string()))
    }
}

// --- Gemini ---

#[derive(Debug)]
struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    fn new(client: reqwest::Client, api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.to_string(),
            client,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiError {
    message: String,
}

impl GeminiResponse {
    fn into_text(self) -> Result<String, BackendError> {
        if let Some(err) = self.error {
            return Err(BackendError::Malformed(format!("Gemini returned error: {}", err.message)));
        }

        let first = self
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| BackendError::Empty("Gemini returned no candidates".to_string()))?;

        let reason = first.finish_reason.unwrap_or_else(|| "UNKNOWN".to_string());
        first
            .content
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| BackendError::Empty(format!("Finish reason: {}", reason)))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(
        &self,
        prompt: &str,
        params: &CompletionParams,
    ) -> Result<String, BackendError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart { text: prompt.to_string() }],
            }],
            generation_config: GeminiGenerationConfig {
                max_output_tokens: params.max_tokens,
                temperature: params.temperature,
                top_p: TOP_P,
            },
        };

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let body = read_body(resp).await?;
        let result: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| BackendError::Malformed(format!("{}. Body: {}", e, body)))?;
        result.into_text()
    }
}
