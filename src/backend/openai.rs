//! OpenAI-compatible chat completion client
//!
//! Whole-response calls against:
//! - Endpoint: POST {base_url}/chat/completions
//! - Auth: bearer API key
//! - Failures classified into [`BackendError`] by status and message

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backend::types::{BackendClient, BackendError, CompletionParams, EMPTY_COMPLETION};
use crate::errors::{GatewayError, Result};
use crate::types::ChatMessage;

/// Default OpenAI API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default request timeout (60 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Phrases a provider uses when it rejects the model itself
const MODEL_UNAVAILABLE_MARKERS: [&str; 3] = ["model not found", "does not exist", "unsupported model"];

/// OpenAI-compatible backend client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    /// Create client against the public OpenAI endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(DEFAULT_BASE_URL, api_key, DEFAULT_TIMEOUT)
    }

    /// Create client with custom configuration
    pub fn with_config(base_url: &str, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl BackendClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> std::result::Result<String, BackendError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request = CompletionRequest {
            model: &params.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &error_message(status, &body)));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Unknown(format!("Failed to parse response: {}", e)))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| EMPTY_COMPLETION.to_string()))
    }
}

/// Map a non-success status and its message to a failure class
pub fn classify_status(status: StatusCode, message: &str) -> BackendError {
    let message = message.to_string();
    let lowered = message.to_lowercase();

    match status.as_u16() {
        404 => BackendError::NotFound(message),
        401 | 403 => BackendError::Unauthorized(message),
        429 => BackendError::RateLimited(message),
        408 | 500..=599 => BackendError::Transient(message),
        _ if MODEL_UNAVAILABLE_MARKERS.iter().any(|m| lowered.contains(m)) => {
            BackendError::NotFound(message)
        }
        _ => BackendError::Unknown(message),
    }
}

fn classify_transport(err: reqwest::Error) -> BackendError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        BackendError::Transient(err.to_string())
    } else {
        BackendError::Unknown(err.to_string())
    }
}

/// Prefer the provider's own error message over the raw body
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, body.trim())
            }
        })
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Provider error envelope
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}
