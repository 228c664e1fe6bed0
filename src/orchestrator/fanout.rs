//! Fan-out orchestrator
//!
//! Sends one conversation to several models at once:
//! - One shared, read-only message list for every target
//! - All calls polled together; none waits on another
//! - Not-found failures retried once against the model's fallback
//! - Any other failure becomes an inline error result for that model
//! - Results in the caller's target order, whatever the completion order

use futures_util::future::join_all;
use std::sync::Arc;

use crate::backend::{complete_logged, BackendClient, BackendError, CompletionParams, DEFAULT_TEMPERATURE};
use crate::errors::{GatewayError, Result};
use crate::logging::{LogEvent, RequestContext, RequestLogger};
use crate::models::{ModelRegistry, ModelSpec};
use crate::prompt::{PromptComposer, PromptKind};
use crate::types::{ChatMessage, ConversationTurn, ModelResponse};

/// Concurrent multi-model chat dispatcher
pub struct FanoutOrchestrator {
    backend: Arc<dyn BackendClient>,
    registry: Arc<ModelRegistry>,
    composer: PromptComposer,
    logger: Arc<dyn RequestLogger>,
    temperature: f32,
}

impl FanoutOrchestrator {
    /// Create orchestrator with the default temperature
    pub fn new(
        backend: Arc<dyn BackendClient>,
        registry: Arc<ModelRegistry>,
        logger: Arc<dyn RequestLogger>,
    ) -> Self {
        Self {
            backend,
            registry,
            composer: PromptComposer::new(),
            logger,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set sampling temperature for every call
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model registry used to resolve targets
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Send `new_message` after `history` to every model in `targets`
    ///
    /// Fails only when `targets` is empty or names an unknown model, and
    /// then before any backend call. Backend failures are returned as
    /// error results in their model's slot.
    pub async fn dispatch(
        &self,
        ctx: &RequestContext,
        history: &[ConversationTurn],
        new_message: &str,
        targets: &[String],
    ) -> Result<Vec<ModelResponse>> {
        if targets.is_empty() {
            return Err(GatewayError::validation("At least one model must be specified"));
        }
        let specs = self.registry.resolve_all(targets)?;

        let messages = self
            .composer
            .compose(PromptKind::Chat, history, new_message, None);

        tracing::info!(
            request_id = %ctx.request_id,
            models = targets.len(),
            messages = messages.len(),
            "dispatching chat"
        );

        let calls = specs
            .into_iter()
            .map(|spec| self.call_model(ctx, spec, &messages));

        Ok(join_all(calls).await)
    }

    /// One target's call, including its single fallback attempt
    async fn call_model(
        &self,
        ctx: &RequestContext,
        spec: &ModelSpec,
        messages: &[ChatMessage],
    ) -> ModelResponse {
        let err = match self.complete(ctx, spec, messages).await {
            Ok(text) => return ModelResponse::new(&spec.id, text),
            Err(err) => err,
        };

        let fallback = match self.registry.fallback_for(spec) {
            Some(fallback) if err.is_model_unavailable() => fallback,
            _ => return error_response(&spec.id, &err.to_string()),
        };

        tracing::warn!(
            request_id = %ctx.request_id,
            model = %spec.id,
            fallback = %fallback.id,
            "model unavailable, falling back"
        );
        self.logger.record(
            ctx.request_id,
            LogEvent::Fallback {
                model: spec.id.clone(),
                fallback: fallback.id.clone(),
            },
        );

        match self.complete(ctx, fallback, messages).await {
            Ok(text) => ModelResponse::new(ModelResponse::fallback_label(&spec.id, &fallback.id), text),
            Err(fallback_err) => error_response(
                &spec.id,
                &format!("{}; fallback to {} failed: {}", err, fallback.id, fallback_err),
            ),
        }
    }

    async fn complete(
        &self,
        ctx: &RequestContext,
        spec: &ModelSpec,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, BackendError> {
        let params = CompletionParams::new(&spec.id, spec.max_tokens).with_temperature(self.temperature);
        complete_logged(
            self.backend.as_ref(),
            self.logger.as_ref(),
            ctx.request_id,
            messages,
            &params,
        )
        .await
    }
}

/// Inline result standing in for a failed model
fn error_response(model: &str, failure: &str) -> ModelResponse {
    ModelResponse::new(model, format!("Error: {}", failure))
}
