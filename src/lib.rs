//! fanout-rag - Multi-model chat fan-out and RAG gateway
//!
//! Stateless HTTP gateway with two pipelines sharing one backend client:
//! one conversation fanned out to several models concurrently, and a
//! retrieval-augmented answer grounded in a small knowledge base.
//!
//! # Architecture
//!
//! - **Chat**: Composer -> Orchestrator -> Backend x N -> combined results
//! - **RAG**: Retriever -> Composer -> Backend x 1 -> answer with sources
//! - **Logging**: append-only request log plus diagnostic tracing

pub mod errors;
pub mod types;

pub mod backend;
pub mod models;
pub mod prompt;

pub mod orchestrator;
pub mod rag;

pub mod cli;
pub mod config;
pub mod logging;
pub mod server;

// Re-export commonly used types
pub use errors::{GatewayError, Result};
