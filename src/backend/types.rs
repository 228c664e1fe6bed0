//! Backend capability contract
//!
//! Defines what the pipelines need from a language model: send role-tagged
//! messages with parameters, receive text or a typed failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ChatMessage;

/// Text used when a backend answers with no content
pub const EMPTY_COMPLETION: &str = "No response generated";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Typed backend failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Model does not exist or is not available to this account
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Timeouts, connection failures and server-side errors
    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("{0}")]
    Unknown(String),
}

impl BackendError {
    /// Whether the failure means the model itself is unavailable
    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }

    /// Short class name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            BackendError::NotFound(_) => "not_found",
            BackendError::RateLimited(_) => "rate_limited",
            BackendError::Unauthorized(_) => "unauthorized",
            BackendError::Transient(_) => "transient",
            BackendError::Unknown(_) => "unknown",
        }
    }
}

/// Parameters for one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionParams {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A language model backend
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Short name of the backend for logs
    fn name(&self) -> &str;

    /// Generate a completion for `messages`, in the order given
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_not_found_is_unavailable() {
        assert!(BackendError::NotFound("gpt-5".into()).is_model_unavailable());
        assert!(!BackendError::RateLimited("x".into()).is_model_unavailable());
        assert!(!BackendError::Unauthorized("x".into()).is_model_unavailable());
        assert!(!BackendError::Transient("x".into()).is_model_unavailable());
        assert!(!BackendError::Unknown("x".into()).is_model_unavailable());
    }

    #[test]
    fn test_error_display_carries_message() {
        let err = BackendError::NotFound("The model `gpt-4` does not exist".into());
        assert!(err.to_string().contains("does not exist"));
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_params_default_temperature() {
        let params = CompletionParams::new("gpt-4", 4000);
        assert_eq!(params.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(params.with_temperature(0.2).temperature, 0.2);
    }
}
