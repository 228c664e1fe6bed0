// Retriever: scores and ranks the knowledge base against a query
use std::sync::Arc;

use crate::rag::knowledge::KnowledgeBase;
use crate::rag::retrieval::scorer::{LexicalScorer, RelevanceScorer};
use crate::types::SourceRef;

/// Ranks every knowledge base entry for a query
#[derive(Clone)]
pub struct Retriever {
    knowledge: Arc<KnowledgeBase>,
    scorer: Arc<dyn RelevanceScorer>,
}

impl Retriever {
    /// Create retriever using lexical similarity
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self::with_scorer(knowledge, Arc::new(LexicalScorer))
    }

    /// Create with a custom scorer
    pub fn with_scorer(knowledge: Arc<KnowledgeBase>, scorer: Arc<dyn RelevanceScorer>) -> Self {
        Self { knowledge, scorer }
    }

    /// Score all entries, ordered by relevance descending
    ///
    /// Ties keep knowledge base order.
    pub fn retrieve(&self, query: &str) -> Vec<SourceRef> {
        let mut sources: Vec<SourceRef> = self
            .knowledge
            .entries()
            .iter()
            .map(|entry| SourceRef {
                title: entry.title.clone(),
                content: entry.content.clone(),
                relevance: self.scorer.score(query, entry),
            })
            .collect();

        sources.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        sources
    }

    /// Knowledge base this retriever ranks
    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }
}

/// Take the `k` most relevant sources from an ordered list
pub fn top_k(sources: &[SourceRef], k: usize) -> Vec<SourceRef> {
    sources.iter().take(k).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::knowledge::KnowledgeEntry;
    use crate::rag::retrieval::scorer::RandomScorer;

    fn is_sorted_desc(sources: &[SourceRef]) -> bool {
        sources.windows(2).all(|w| w[0].relevance >= w[1].relevance)
    }

    #[test]
    fn test_retrieve_returns_every_entry() {
        let retriever = Retriever::new(Arc::new(KnowledgeBase::default()));
        let sources = retriever.retrieve("What is RAG?");
        assert_eq!(sources.len(), 3);
        assert!(is_sorted_desc(&sources));
    }

    #[test]
    fn test_retrieve_ranks_matching_entry_first() {
        let kb = KnowledgeBase::new(vec![
            KnowledgeEntry::new("Gardening", "water the tomatoes daily"),
            KnowledgeEntry::new("Compilers", "a parser turns tokens into a syntax tree"),
        ]);
        let retriever = Retriever::new(Arc::new(kb));

        let sources = retriever.retrieve("how does a parser build a syntax tree");
        assert_eq!(sources[0].title, "Compilers");
    }

    #[test]
    fn test_empty_query_keeps_order_and_floor() {
        let retriever = Retriever::new(Arc::new(KnowledgeBase::default()));
        let sources = retriever.retrieve("");
        assert_eq!(sources[0].title, "RAG Overview");
        assert!(sources.iter().all(|s| s.relevance == 0.5));
    }

    #[test]
    fn test_random_scorer_still_sorted() {
        let retriever =
            Retriever::with_scorer(Arc::new(KnowledgeBase::default()), Arc::new(RandomScorer));
        for _ in 0..50 {
            assert!(is_sorted_desc(&retriever.retrieve("anything")));
        }
    }

    #[test]
    fn test_top_k_prefix() {
        let retriever = Retriever::new(Arc::new(KnowledgeBase::default()));
        let sources = retriever.retrieve("RAG architecture retriever");
        let top = top_k(&sources, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[..], sources[..2]);
        assert_eq!(top_k(&sources, 10).len(), 3);
    }

    #[test]
    fn test_empty_knowledge_base() {
        let retriever = Retriever::new(Arc::new(KnowledgeBase::new(Vec::new())));
        assert!(retriever.retrieve("anything").is_empty());
    }
}
