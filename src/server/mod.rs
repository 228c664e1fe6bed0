//! HTTP surface of the gateway
//!
//! Routes:
//! - `POST /api/chat`: fan one conversation out to several models
//! - `POST /api/rag`: knowledge-grounded answer with citations
//! - `GET /api/models`: the model registry
//! - `GET /health`: liveness

pub mod handlers;
pub mod request;

pub use handlers::ModelInfo;
pub use request::{ChatRequest, ChatResponse, RagRequest, Timing};

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::backend::BackendClient;
use crate::config::Config;
use crate::logging::RequestLogger;
use crate::orchestrator::FanoutOrchestrator;
use crate::prompt::PromptComposer;
use crate::rag::{RAGPipeline, Retriever};

/// Shared application state
pub struct AppState {
    pub orchestrator: FanoutOrchestrator,
    pub rag: RAGPipeline,
    pub logger: Arc<dyn RequestLogger>,
}

impl AppState {
    pub fn new(
        orchestrator: FanoutOrchestrator,
        rag: RAGPipeline,
        logger: Arc<dyn RequestLogger>,
    ) -> Self {
        Self {
            orchestrator,
            rag,
            logger,
        }
    }

    /// Wire both pipelines from configuration around one backend
    pub fn from_config(
        config: &Config,
        backend: Arc<dyn BackendClient>,
        logger: Arc<dyn RequestLogger>,
    ) -> Result<Self> {
        let registry = Arc::new(config.registry()?);
        let orchestrator = FanoutOrchestrator::new(backend.clone(), registry, logger.clone())
            .with_temperature(config.backend.temperature);

        let retriever = Retriever::with_scorer(Arc::new(config.knowledge_base()), config.rag.scorer.build());
        let mut rag = RAGPipeline::with_config(retriever, backend, logger.clone(), config.rag_config());
        if let Some(template) = &config.rag.template {
            rag = rag.with_composer(PromptComposer::with_template(template.clone()));
        }

        Ok(Self::new(orchestrator, rag, logger))
    }
}

/// Build the router with every route and the trace layer
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/rag", post(handlers::rag))
        .route("/api/models", get(handlers::list_models))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl-C
pub async fn run(state: Arc<AppState>, addr: &str) -> Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")?;
    Ok(())
}
