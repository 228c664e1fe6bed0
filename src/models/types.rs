//! Model specification types
//!
//! A [`ModelSpec`] describes one backend model the gateway may target and,
//! optionally, the model to substitute when it is unavailable.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default output token budget
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

/// Static description of a target model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Identifier sent to the backend (e.g., "gpt-4")
    pub id: String,

    /// Model substituted when this one reports not-found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// Output token budget for calls to this model
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl ModelSpec {
    /// Create a spec with the default token budget and no fallback
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fallback: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

impl fmt::Display for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.fallback {
            Some(fallback) => write!(f, "{} (max {} tokens, fallback {})", self.id, self.max_tokens, fallback),
            None => write!(f, "{} (max {} tokens)", self.id, self.max_tokens),
        }
    }
}
