//! Backend calls that write through the request log
//!
//! Records the request before the call and the response or failure after
//! it, so every backend call appears in the log with its timing.

use std::time::Instant;
use uuid::Uuid;

use crate::backend::types::{BackendClient, BackendError, CompletionParams};
use crate::logging::{LogEvent, RequestLogger};
use crate::types::ChatMessage;

/// Call `backend` and log the exchange under `request_id`
pub async fn complete_logged(
    backend: &dyn BackendClient,
    logger: &dyn RequestLogger,
    request_id: Uuid,
    messages: &[ChatMessage],
    params: &CompletionParams,
) -> Result<String, BackendError> {
    logger.record(
        request_id,
        LogEvent::ModelRequest {
            model: params.model.clone(),
            message_count: messages.len(),
            estimated_tokens: messages.iter().map(ChatMessage::estimate_tokens).sum(),
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        },
    );

    let start = Instant::now();
    let result = backend.complete(messages, params).await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(text) => logger.record(
            request_id,
            LogEvent::ModelResponse {
                model: params.model.clone(),
                duration_ms,
                response: text.clone(),
            },
        ),
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                model = %params.model,
                kind = err.kind(),
                "backend call failed: {}",
                err
            );
            logger.record(
                request_id,
                LogEvent::ModelError {
                    model: params.model.clone(),
                    kind: err.kind().to_string(),
                    message: err.to_string(),
                    duration_ms,
                },
            );
        }
    }

    result
}
