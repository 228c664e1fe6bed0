//! Request bodies for the POST endpoints
//!
//! Bodies are parsed from raw bytes so malformed JSON gets the same `{error}`
//! shape as any other validation failure.

use serde::{Deserialize, Serialize};

use crate::errors::{GatewayError, Result};
use crate::types::{ConversationTurn, ModelResponse, SourceRef, TurnRole};

/// Validated `POST /api/chat` body
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub messages: Vec<ConversationTurn>,
    pub models: Vec<String>,
}

/// Validated `POST /api/rag` body
#[derive(Debug, Clone, PartialEq)]
pub struct RagRequest {
    pub message: String,
    pub messages: Vec<ConversationTurn>,
}

/// Chat endpoint response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub responses: Vec<ModelResponse>,
    pub timing: Timing,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timing {
    /// Wall-clock milliseconds for the whole request
    pub total: u64,
}

#[derive(Debug, Deserialize)]
struct WireTurn {
    role: String,
    content: String,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    sources: Option<Vec<SourceRef>>,
}

#[derive(Debug, Deserialize)]
struct WireBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    messages: Option<Vec<WireTurn>>,
    #[serde(default)]
    models: Option<Vec<String>>,
}

impl ChatRequest {
    pub fn parse(body: &[u8]) -> Result<Self> {
        let wire = parse_body(body)?;
        let message = required_message(wire.message)?;

        let models = wire.models.unwrap_or_default();
        if models.is_empty() {
            return Err(GatewayError::validation("At least one model must be specified"));
        }

        Ok(Self {
            message,
            messages: conversation(wire.messages)?,
            models,
        })
    }
}

impl RagRequest {
    pub fn parse(body: &[u8]) -> Result<Self> {
        let wire = parse_body(body)?;
        let message = required_message(wire.message)?;

        Ok(Self {
            message,
            messages: conversation(wire.messages)?,
        })
    }
}

fn parse_body(body: &[u8]) -> Result<WireBody> {
    serde_json::from_slice(body).map_err(|e| GatewayError::validation(format!("Invalid JSON: {}", e)))
}

fn required_message(message: Option<String>) -> Result<String> {
    match message {
        Some(message) if !message.trim().is_empty() => Ok(message),
        _ => Err(GatewayError::validation("Message is required")),
    }
}

fn conversation(turns: Option<Vec<WireTurn>>) -> Result<Vec<ConversationTurn>> {
    turns
        .unwrap_or_default()
        .into_iter()
        .map(|turn| {
            let role = match turn.role.as_str() {
                "user" => TurnRole::User,
                "assistant" => TurnRole::Assistant,
                other => return Err(GatewayError::validation(format!("Invalid role: {}", other))),
            };
            Ok(ConversationTurn {
                role,
                content: turn.content,
                model: turn.model,
                sources: turn.sources,
            })
        })
        .collect()
}
