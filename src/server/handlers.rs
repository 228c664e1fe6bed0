//! HTTP handlers
//!
//! Every request gets its own `RequestContext`; its id ties together all of
//! the request's lines in the request log.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::request::{ChatRequest, ChatResponse, RagRequest, Timing};
use super::AppState;
use crate::errors::{GatewayError, Result};
use crate::logging::{LogEvent, RequestContext};
use crate::rag::RAGAnswer;

/// Registry entry as listed by `/api/models`
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub fallback: Option<String>,
    pub max_tokens: u32,
}

impl GatewayError {
    /// HTTP status for an error escaping a handler
    pub fn status_code(&self) -> StatusCode {
        if self.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

pub async fn chat(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let ctx = RequestContext::new();
    match run_chat(&state, &ctx, &body).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => failure(&state, &ctx, "/api/chat", err),
    }
}

pub async fn rag(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let ctx = RequestContext::new();
    match run_rag(&state, &ctx, &body).await {
        Ok(answer) => Json(answer).into_response(),
        Err(err) => failure(&state, &ctx, "/api/rag", err),
    }
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelInfo>> {
    let models = state
        .orchestrator
        .registry()
        .specs()
        .iter()
        .map(|spec| ModelInfo {
            id: spec.id.clone(),
            fallback: spec.fallback.clone(),
            max_tokens: spec.max_tokens,
        })
        .collect();
    Json(models)
}

async fn run_chat(state: &AppState, ctx: &RequestContext, body: &[u8]) -> Result<ChatResponse> {
    let request = ChatRequest::parse(body)?;

    state.logger.record(
        ctx.request_id,
        LogEvent::ChatRequest {
            models: request.models.clone(),
            message: request.message.clone(),
            history_len: request.messages.len(),
        },
    );

    let responses = state
        .orchestrator
        .dispatch(ctx, &request.messages, &request.message, &request.models)
        .await?;

    let total = ctx.elapsed_ms();
    state.logger.record(
        ctx.request_id,
        LogEvent::ChatCompleted {
            responses: responses.len(),
            total_ms: total,
        },
    );
    tracing::info!(request_id = %ctx.request_id, total_ms = total, "chat completed");

    Ok(ChatResponse {
        responses,
        timing: Timing { total },
    })
}

async fn run_rag(state: &AppState, ctx: &RequestContext, body: &[u8]) -> Result<RAGAnswer> {
    let request = RagRequest::parse(body)?;

    state.logger.record(
        ctx.request_id,
        LogEvent::RagRequest {
            message: request.message.clone(),
            history_len: request.messages.len(),
        },
    );

    let answer = state.rag.answer(ctx, &request.messages, &request.message).await?;
    tracing::info!(
        request_id = %ctx.request_id,
        sources = answer.sources.len(),
        total_ms = ctx.elapsed_ms(),
        "rag completed"
    );
    Ok(answer)
}

fn failure(state: &AppState, ctx: &RequestContext, endpoint: &str, err: GatewayError) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!(request_id = %ctx.request_id, endpoint, error = %err, "request failed");
    } else {
        tracing::debug!(request_id = %ctx.request_id, endpoint, error = %err, "request rejected");
    }

    state.logger.record(
        ctx.request_id,
        LogEvent::RequestFailed {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            error: err.to_string(),
        },
    );
    err.into_response()
}
