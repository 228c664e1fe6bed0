//! Request log events
//!
//! Every event is an already structured record, rendered to a single line.
//! Free text is written with `{:?}` so embedded newlines stay escaped.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Instant;
use uuid::Uuid;

/// Per-request identity, created at handler entry
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub started_at: DateTime<Utc>,
    started: Instant,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Milliseconds since the request started
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Citation summary kept in the log
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSummary {
    pub title: String,
    pub relevance: f32,
}

/// Request log event types
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    // Chat events
    ChatRequest {
        models: Vec<String>,
        message: String,
        history_len: usize,
    },
    ModelRequest {
        model: String,
        message_count: usize,
        estimated_tokens: usize,
        max_tokens: u32,
        temperature: f32,
    },
    ModelResponse {
        model: String,
        duration_ms: u64,
        response: String,
    },
    ModelError {
        model: String,
        kind: String,
        message: String,
        duration_ms: u64,
    },
    Fallback {
        model: String,
        fallback: String,
    },
    ChatCompleted {
        responses: usize,
        total_ms: u64,
    },

    // RAG events
    RagRequest {
        message: String,
        history_len: usize,
    },
    RagCompleted {
        response: String,
        sources: Vec<SourceSummary>,
        total_ms: u64,
    },

    // Terminal failure of either endpoint
    RequestFailed {
        endpoint: String,
        status: u16,
        error: String,
    },
}

impl LogEvent {
    /// Short event name
    pub fn name(&self) -> &'static str {
        match self {
            LogEvent::ChatRequest { .. } => "chat_request",
            LogEvent::ModelRequest { .. } => "model_request",
            LogEvent::ModelResponse { .. } => "model_response",
            LogEvent::ModelError { .. } => "model_error",
            LogEvent::Fallback { .. } => "fallback",
            LogEvent::ChatCompleted { .. } => "chat_completed",
            LogEvent::RagRequest { .. } => "rag_request",
            LogEvent::RagCompleted { .. } => "rag_completed",
            LogEvent::RequestFailed { .. } => "request_failed",
        }
    }

    /// Model the event concerns, if any
    pub fn model(&self) -> Option<&str> {
        match self {
            LogEvent::ModelRequest { model, .. }
            | LogEvent::ModelResponse { model, .. }
            | LogEvent::ModelError { model, .. }
            | LogEvent::Fallback { model, .. } => Some(model),
            _ => None,
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEvent::ChatRequest { models, message, history_len } => write!(
                f,
                "chat_request models=[{}] history={} message={:?}",
                models
                    .iter()
                    .map(|m| format!("{:?}", m))
                    .collect::<Vec<_>>()
                    .join(", "),
                history_len,
                message
            ),
            LogEvent::ModelRequest {
                model,
                message_count,
                estimated_tokens,
                max_tokens,
                temperature,
            } => write!(
                f,
                "[{}] model_request messages={} est_tokens={} max_tokens={} temperature={}",
                model, message_count, estimated_tokens, max_tokens, temperature
            ),
            LogEvent::ModelResponse { model, duration_ms, response } => write!(
                f,
                "[{}] model_response time={}ms response={:?}",
                model, duration_ms, response
            ),
            LogEvent::ModelError { model, kind, message, duration_ms } => write!(
                f,
                "[{}] model_error kind={} time={}ms message={:?}",
                model, kind, duration_ms, message
            ),
            LogEvent::Fallback { model, fallback } => {
                write!(f, "[{}] fallback to={}", model, fallback)
            }
            LogEvent::ChatCompleted { responses, total_ms } => write!(
                f,
                "chat_completed responses={} total={}ms",
                responses, total_ms
            ),
            LogEvent::RagRequest { message, history_len } => write!(
                f,
                "rag_request history={} message={:?}",
                history_len, message
            ),
            LogEvent::RagCompleted { response, sources, total_ms } => {
                let sources = sources
                    .iter()
                    .map(|s| format!("{:?}:{:.3}", s.title, s.relevance))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "rag_completed total={}ms sources=[{}] response={:?}",
                    total_ms, sources, response
                )
            }
            LogEvent::RequestFailed { endpoint, status, error } => write!(
                f,
                "request_failed endpoint={} status={} error={:?}",
                endpoint, status, error
            ),
        }
    }
}
