// Relevance scorers for knowledge base entries
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::rag::knowledge::KnowledgeEntry;

/// Lowest relevance a scorer may assign
pub const MIN_RELEVANCE: f32 = 0.5;

/// Highest relevance a scorer may assign
pub const MAX_RELEVANCE: f32 = 1.0;

/// Scores one entry against a query
///
/// Implementations must return a value in `[MIN_RELEVANCE, MAX_RELEVANCE]`.
pub trait RelevanceScorer: Send + Sync {
    fn score(&self, query: &str, entry: &KnowledgeEntry) -> f32;
}

/// Scoring strategy selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Term-frequency cosine similarity
    #[default]
    Lexical,
    /// Uniform random relevance, ignoring the query
    Random,
}

impl ScorerKind {
    pub fn build(self) -> Arc<dyn RelevanceScorer> {
        match self {
            ScorerKind::Lexical => Arc::new(LexicalScorer),
            ScorerKind::Random => Arc::new(RandomScorer),
        }
    }
}

/// Cosine similarity of term-frequency vectors, mapped onto the relevance range
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalScorer;

impl LexicalScorer {
    /// Lower-cased alphanumeric term counts
    fn term_frequencies(text: &str) -> HashMap<String, f32> {
        let mut counts = HashMap::new();
        for term in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            *counts.entry(term.to_lowercase()).or_insert(0.0) += 1.0;
        }
        counts
    }

    /// Cosine similarity in [0, 1]; 0 when either side has no terms
    pub fn similarity(a: &str, b: &str) -> f32 {
        let a = Self::term_frequencies(a);
        let b = Self::term_frequencies(b);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let dot: f32 = a
            .iter()
            .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
            .sum();
        let norm_a = a.values().map(|w| w * w).sum::<f32>().sqrt();
        let norm_b = b.values().map(|w| w * w).sum::<f32>().sqrt();

        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

impl RelevanceScorer for LexicalScorer {
    fn score(&self, query: &str, entry: &KnowledgeEntry) -> f32 {
        let document = format!("{} {}", entry.title, entry.content);
        let similarity = Self::similarity(query, &document);

        (MIN_RELEVANCE + (MAX_RELEVANCE - MIN_RELEVANCE) * similarity)
            .clamp(MIN_RELEVANCE, MAX_RELEVANCE)
    }
}

/// Uniformly random relevance
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomScorer;

impl RelevanceScorer for RandomScorer {
    fn score(&self, _query: &str, _entry: &KnowledgeEntry) -> f32 {
        rand::thread_rng().gen_range(MIN_RELEVANCE..=MAX_RELEVANCE)
    }
}
