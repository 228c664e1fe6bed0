//! Core type definitions shared by both pipelines

pub mod messages;

pub use messages::{ChatMessage, ConversationTurn, ModelResponse, Role, SourceRef, TurnRole};
