// Retrieval: relevance scoring and ranking
pub mod engine;
pub mod scorer;

pub use engine::{top_k, Retriever};
pub use scorer::{
    LexicalScorer, RandomScorer, RelevanceScorer, ScorerKind, MAX_RELEVANCE, MIN_RELEVANCE,
};
