//! Prompt composition for both pipelines

pub mod composer;

pub use composer::{format_context, PromptComposer, PromptKind, DEFAULT_RAG_TEMPLATE};
