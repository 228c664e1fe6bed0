//! In-process scripted backend
//!
//! Answers without network access: scripted models return their configured
//! outcome, every other model echoes the last user message. Each call is
//! recorded so callers can inspect what was sent.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::backend::types::{BackendClient, BackendError, CompletionParams};
use crate::types::{ChatMessage, Role};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub params: CompletionParams,
    pub messages: Vec<ChatMessage>,
}

/// Deterministic backend for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    outcomes: HashMap<String, Result<String, BackendError>>,
    delays: HashMap<String, Duration>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedBackend {
    /// Create backend where every model echoes
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful reply for `model`
    pub fn with_reply(mut self, model: impl Into<String>, reply: impl Into<String>) -> Self {
        self.outcomes.insert(model.into(), Ok(reply.into()));
        self
    }

    /// Script a failure for `model`
    pub fn with_failure(mut self, model: impl Into<String>, error: BackendError) -> Self {
        self.outcomes.insert(model.into(), Err(error));
        self
    }

    /// Delay every answer from `model`
    pub fn with_delay(mut self, model: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(model.into(), delay);
        self
    }

    /// Snapshot of all calls made so far, in call order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    fn echo(messages: &[ChatMessage], model: &str) -> String {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or("");
        format!("[{}] {}", model, last_user)
    }
}

#[async_trait]
impl BackendClient for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &CompletionParams,
    ) -> Result<String, BackendError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                params: params.clone(),
                messages: messages.to_vec(),
            });
        }

        if let Some(delay) = self.delays.get(&params.model) {
            tokio::time::sleep(*delay).await;
        }

        match self.outcomes.get(&params.model) {
            Some(outcome) => outcome.clone(),
            None => Ok(Self::echo(messages, &params.model)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_last_user_message() {
        let backend = ScriptedBackend::new();
        let messages = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];
        let text = backend
            .complete(&messages, &CompletionParams::new("gpt-4", 10))
            .await
            .unwrap();
        assert_eq!(text, "[gpt-4] second");
    }

    #[tokio::test]
    async fn test_scripted_outcomes() {
        let backend = ScriptedBackend::new()
            .with_reply("a", "hello")
            .with_failure("b", BackendError::RateLimited("later".into()));

        let messages = vec![ChatMessage::user("q")];
        assert_eq!(
            backend.complete(&messages, &CompletionParams::new("a", 10)).await,
            Ok("hello".to_string())
        );
        assert_eq!(
            backend.complete(&messages, &CompletionParams::new("b", 10)).await,
            Err(BackendError::RateLimited("later".into()))
        );
    }

    #[tokio::test]
    async fn test_calls_are_recorded_across_clones() {
        let backend = ScriptedBackend::new();
        let clone = backend.clone();
        clone
            .complete(&[ChatMessage::user("q")], &CompletionParams::new("m", 7))
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.calls()[0].params.max_tokens, 7);
    }
}
