//! Prompt composer
//!
//! Turns a caller conversation plus a new turn into the role-tagged message
//! list a backend consumes. Message order is preserved end to end.

use crate::types::{ChatMessage, ConversationTurn, SourceRef};

/// Placeholder replaced by the retrieved passages
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Default RAG instruction template
pub const DEFAULT_RAG_TEMPLATE: &str = "You are a helpful AI assistant with access to a knowledge base.
Base your response on the following context, but express it naturally in your own words.
If the context doesn't contain relevant information, you can draw from your general knowledge.

Context:
{context}

Remember to be clear and concise in your response.";

/// Which pipeline the prompt is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Chat,
    Rag,
}

/// Builds backend message lists
#[derive(Debug, Clone)]
pub struct PromptComposer {
    rag_template: String,
}

impl PromptComposer {
    /// Create composer with the default RAG template
    pub fn new() -> Self {
        Self {
            rag_template: DEFAULT_RAG_TEMPLATE.to_string(),
        }
    }

    /// Create with a custom RAG template
    ///
    /// A template without `{context}` gets the passages appended.
    pub fn with_template(template: impl Into<String>) -> Self {
        let mut template = template.into();
        if !template.contains(CONTEXT_PLACEHOLDER) {
            template.push_str("\n\nContext:\n");
            template.push_str(CONTEXT_PLACEHOLDER);
        }
        Self {
            rag_template: template,
        }
    }

    /// Compose messages for `kind`
    ///
    /// `Rag` prepends one system message carrying the passages in the order
    /// given; `Chat` adds no system message. History follows in its original
    /// order and the new user message comes last.
    pub fn compose(
        &self,
        kind: PromptKind,
        history: &[ConversationTurn],
        new_message: &str,
        context: Option<&[SourceRef]>,
    ) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);

        if kind == PromptKind::Rag {
            messages.push(ChatMessage::system(self.system_prompt(context.unwrap_or(&[]))));
        }

        messages.extend(history.iter().map(ConversationTurn::to_message));
        messages.push(ChatMessage::user(new_message));
        messages
    }

    /// RAG system prompt for the given passages
    pub fn system_prompt(&self, sources: &[SourceRef]) -> String {
        self.rag_template
            .replace(CONTEXT_PLACEHOLDER, &format_context(sources))
    }
}

impl Default for PromptComposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Passages as `title:\ncontent`, blank-line separated
pub fn format_context(sources: &[SourceRef]) -> String {
    sources
        .iter()
        .map(|s| format!("{}:\n{}", s.title, s.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
