// End-to-end RAG pipeline: retrieve -> compose -> generate -> cite
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::backend::{complete_logged, BackendClient, CompletionParams, DEFAULT_TEMPERATURE};
use crate::errors::{GatewayError, Result};
use crate::logging::{LogEvent, RequestContext, RequestLogger, SourceSummary};
use crate::prompt::{PromptComposer, PromptKind};
use crate::rag::retrieval::{top_k, Retriever};
use crate::types::{ConversationTurn, SourceRef};

/// RAG pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RAGConfig {
    /// Model that generates the grounded answer
    pub model: String,
    /// Output token budget for the answer
    pub max_tokens: u32,
    pub temperature: f32,
    /// Number of sources surfaced to the caller
    pub top_k: usize,
}

impl Default for RAGConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: DEFAULT_TEMPERATURE,
            top_k: 2,
        }
    }
}

/// Grounded answer with its citations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RAGAnswer {
    pub response: String,
    /// Most relevant sources, best first
    pub sources: Vec<SourceRef>,
}

/// End-to-end RAG pipeline
pub struct RAGPipeline {
    retriever: Retriever,
    composer: PromptComposer,
    backend: Arc<dyn BackendClient>,
    logger: Arc<dyn RequestLogger>,
    config: RAGConfig,
}

impl RAGPipeline {
    /// Create new RAG pipeline
    pub fn new(
        retriever: Retriever,
        backend: Arc<dyn BackendClient>,
        logger: Arc<dyn RequestLogger>,
    ) -> Self {
        Self::with_config(retriever, backend, logger, RAGConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        retriever: Retriever,
        backend: Arc<dyn BackendClient>,
        logger: Arc<dyn RequestLogger>,
        config: RAGConfig,
    ) -> Self {
        Self {
            retriever,
            composer: PromptComposer::new(),
            backend,
            logger,
            config,
        }
    }

    /// Replace the prompt composer
    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = composer;
        self
    }

    /// Answer `message` grounded in the knowledge base
    ///
    /// Every entry goes into the prompt; only the top `top_k` are returned
    /// as sources. A backend failure is returned as an error.
    pub async fn answer(
        &self,
        ctx: &RequestContext,
        history: &[ConversationTurn],
        message: &str,
    ) -> Result<RAGAnswer> {
        if message.trim().is_empty() {
            return Err(GatewayError::validation("Message is required"));
        }

        // Step 1: Rank the whole knowledge base
        let ranked = self.retriever.retrieve(message);

        // Step 2: Compose the grounded prompt
        let messages = self
            .composer
            .compose(PromptKind::Rag, history, message, Some(&ranked));

        // Step 3: Generate
        let params = CompletionParams::new(&self.config.model, self.config.max_tokens)
            .with_temperature(self.config.temperature);
        let response = complete_logged(
            self.backend.as_ref(),
            self.logger.as_ref(),
            ctx.request_id,
            &messages,
            &params,
        )
        .await?;

        self.logger.record(
            ctx.request_id,
            LogEvent::RagCompleted {
                response: response.clone(),
                sources: ranked
                    .iter()
                    .map(|s| SourceSummary {
                        title: s.title.clone(),
                        relevance: s.relevance,
                    })
                    .collect(),
                total_ms: ctx.elapsed_ms(),
            },
        );

        // Step 4: Surface the best sources
        Ok(RAGAnswer {
            response,
            sources: top_k(&ranked, self.config.top_k),
        })
    }

    /// Get current configuration
    pub fn config(&self) -> &RAGConfig {
        &self.config
    }
}
