//! Model registry module
//!
//! This module provides the static catalogue of target models:
//! - Per-model output token budgets
//! - Fallback substitution targets
//! - Identifier resolution for incoming requests

pub mod registry;
pub mod types;

// Re-export key types for convenience
pub use registry::ModelRegistry;
pub use types::{ModelSpec, DEFAULT_MAX_TOKENS};
