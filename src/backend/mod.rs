//! Language model backends
//!
//! This module provides the capability both pipelines call into:
//! - The [`BackendClient`] trait and its typed failures
//! - An OpenAI-compatible HTTP client
//! - A scripted in-process backend for offline runs
//! - Logged calls that write through the request log

pub mod logged;
pub mod openai;
pub mod scripted;
pub mod types;

// Re-export key types for convenience
pub use logged::complete_logged;
pub use openai::OpenAiClient;
pub use scripted::{RecordedCall, ScriptedBackend};
pub use types::{BackendClient, BackendError, CompletionParams, DEFAULT_TEMPERATURE, EMPTY_COMPLETION};
