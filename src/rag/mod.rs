// RAG (Retrieval-Augmented Generation) Pipeline
//
// This module implements knowledge retrieval and grounded generation for
// the RAG endpoint.
//
// Components:
// - Knowledge Base: fixed in-memory passages
// - Retrieval: relevance scoring and ranking of every passage
// - Pipeline: retrieve -> compose -> generate -> cite

pub mod knowledge;
pub mod pipeline;
pub mod retrieval;

// Re-export key types
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use pipeline::{RAGAnswer, RAGConfig, RAGPipeline};
pub use retrieval::{Retriever, ScorerKind};
