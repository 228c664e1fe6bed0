// Fixed in-memory knowledge base for retrieval
use serde::{Deserialize, Serialize};

/// One titled passage; identity is its position in the knowledge base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub title: String,
    pub content: String,
}

impl KnowledgeEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Read-only collection of passages shared by all retrievals
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }

    /// Entries in their fixed order
    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&KnowledgeEntry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeBase {
    /// Built-in passages describing RAG itself
    fn default() -> Self {
        Self::new(vec![
            KnowledgeEntry::new(
                "RAG Overview",
                "Retrieval-Augmented Generation (RAG) is a technique that enhances Large Language \
                 Models by providing them with relevant external knowledge during inference. This \
                 allows the model to generate more accurate and contextual responses.",
            ),
            KnowledgeEntry::new(
                "RAG Benefits",
                "RAG systems offer several advantages: 1) Improved accuracy with up-to-date \
                 information, 2) Reduced hallucination by grounding responses in source documents, \
                 3) Ability to cite sources for transparency.",
            ),
            KnowledgeEntry::new(
                "RAG Architecture",
                "A typical RAG system consists of three main components: 1) A retriever that finds \
                 relevant documents, 2) A generator (usually an LLM) that produces responses, and \
                 3) A knowledge base storing documents and their embeddings.",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_knowledge_base() {
        let kb = KnowledgeBase::default();
        assert_eq!(kb.len(), 3);
        assert_eq!(kb.get(0).unwrap().title, "RAG Overview");
        assert!(kb.entries().iter().all(|e| !e.content.is_empty()));
    }

    #[test]
    fn test_custom_entries_keep_order() {
        let kb = KnowledgeBase::new(vec![
            KnowledgeEntry::new("b", "second"),
            KnowledgeEntry::new("a", "first"),
        ]);
        assert_eq!(kb.entries()[0].title, "b");
        assert!(kb.get(2).is_none());
    }
}
