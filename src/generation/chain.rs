//! History-aware conversational retrieval chain
//!
//! Two model calls per question: an optional history-aware rewrite that
//! turns a follow-up into a standalone search query, then retrieval plus
//! answer generation over the retrieved context.

use std::sync::Arc;

use super::prompt::PromptBuilder;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider};
use crate::retrieval::SessionIndex;
use crate::types::chat::{history_messages, ChatMessage, ChatTurn};

/// Fallback answer when the model returns empty text
const NO_ANSWER_FALLBACK: &str = "No answer could be generated.";

/// Conversational RAG chain over a session index
pub struct ConversationalChain {
    embedder: Arc<dyn EmbeddingProvider>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl ConversationalChain {
    /// Create a chain with the given providers
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm,
            top_k,
        }
    }

    /// Answer a question against the index, using prior turns for context
    pub async fn ask(
        &self,
        index: &SessionIndex,
        history: &[ChatTurn],
        question: &str,
    ) -> Result<String> {
        let query = self.standalone_query(history, question).await?;

        let query_embedding = self.embedder.embed(&query).await?;
        let results = index.search(&query_embedding, self.top_k)?;

        tracing::debug!(
            "Retrieved {} chunks for query \"{}\" (top similarity: {:.3})",
            results.len(),
            query,
            results.first().map(|r| r.similarity).unwrap_or(0.0)
        );

        let context = PromptBuilder::build_context(&results);
        let system = PromptBuilder::answer_system_prompt(&context);

        let mut messages = history_messages(history);
        messages.push(ChatMessage::user(question));

        let answer = self.llm.complete(Some(&system), &messages).await?;

        if answer.trim().is_empty() {
            Ok(NO_ANSWER_FALLBACK.to_string())
        } else {
            Ok(answer)
        }
    }

    /// Produce the retrieval query for a question
    ///
    /// With no prior turns the question is already standalone and no model
    /// call is made. Otherwise the model rewrites it using the conversation.
    async fn standalone_query(&self, history: &[ChatTurn], question: &str) -> Result<String> {
        if history.is_empty() {
            return Ok(question.to_string());
        }

        let mut messages = history_messages(history);
        messages.push(ChatMessage::user(question));
        messages.push(ChatMessage::user(PromptBuilder::rephrase_instruction()));

        let rewritten = self.llm.complete(None, &messages).await?;
        let rewritten = rewritten.trim();

        // A degenerate rewrite falls back to the literal question
        if rewritten.is_empty() {
            tracing::warn!("Query rewrite returned empty text, using original question");
            Ok(question.to_string())
        } else {
            Ok(rewritten.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::{Chunk, ChunkSource};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use uuid::Uuid;

    /// Embedder that maps known phrases onto fixed unit vectors
    struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let lower = text.to_lowercase();
            Ok(if lower.contains("rust") {
                vec![1.0, 0.0]
            } else if lower.contains("python") {
                vec![0.0, 1.0]
            } else {
                vec![0.5, 0.5]
            })
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "keyword-test"
        }
    }

    /// LLM that records every call and replies with canned text
    struct ScriptedLlm {
        rewrite_reply: String,
        answer_reply: String,
        calls: Mutex<Vec<(Option<String>, Vec<ChatMessage>)>>,
    }

    impl ScriptedLlm {
        fn new(rewrite_reply: &str, answer_reply: &str) -> Self {
            Self {
                rewrite_reply: rewrite_reply.to_string(),
                answer_reply: answer_reply.to_string(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn complete(
            &self,
            system_instruction: Option<&str>,
            messages: &[ChatMessage],
        ) -> Result<String> {
            self.calls.lock().push((
                system_instruction.map(|s| s.to_string()),
                messages.to_vec(),
            ));
            // Rewrite calls carry no system instruction
            if system_instruction.is_none() {
                Ok(self.rewrite_reply.clone())
            } else {
                Ok(self.answer_reply.clone())
            }
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "scripted-test"
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn indexed_chunk(content: &str, embedding: Vec<f32>) -> Chunk {
        let mut chunk = Chunk::new(
            Uuid::new_v4(),
            content.to_string(),
            ChunkSource::page("langs.pdf".to_string(), 1, 1),
            0,
            content.len(),
            0,
        );
        chunk.embedding = embedding;
        chunk
    }

    fn test_index() -> SessionIndex {
        SessionIndex::build(vec![
            indexed_chunk("Rust is a systems language.", vec![1.0, 0.0]),
            indexed_chunk("Python is an interpreted language.", vec![0.0, 1.0]),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_question_skips_rewrite() {
        let llm = Arc::new(ScriptedLlm::new("unused", "Rust is compiled."));
        let chain = ConversationalChain::new(Arc::new(KeywordEmbedder), llm.clone(), 2);

        let answer = chain
            .ask(&test_index(), &[], "What is Rust?")
            .await
            .unwrap();
        assert_eq!(answer, "Rust is compiled.");

        // Exactly one LLM call: the answer call, carrying the system prompt
        let calls = llm.calls.lock();
        assert_eq!(calls.len(), 1);
        let (system, messages) = &calls[0];
        assert!(system.as_ref().unwrap().starts_with("You are 'DocQuery AI'"));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "What is Rust?");
    }

    #[tokio::test]
    async fn test_followup_rewrites_against_history() {
        let llm = Arc::new(ScriptedLlm::new("Rust language details", "It is fast."));
        let chain = ConversationalChain::new(Arc::new(KeywordEmbedder), llm.clone(), 1);

        let history = vec![ChatTurn::new("What is Rust?", "A systems language.")];
        let answer = chain
            .ask(&test_index(), &history, "Is it fast?")
            .await
            .unwrap();
        assert_eq!(answer, "It is fast.");

        let calls = llm.calls.lock();
        assert_eq!(calls.len(), 2);

        // First call: the rewrite, no system prompt, ends with the
        // rephrase instruction
        let (rewrite_system, rewrite_messages) = &calls[0];
        assert!(rewrite_system.is_none());
        assert!(rewrite_messages
            .last()
            .unwrap()
            .content
            .contains("generate a search query"));

        // Second call: the answer, its context retrieved for the rewritten
        // query (which mentions Rust, so the Rust chunk wins retrieval)
        let (answer_system, answer_messages) = &calls[1];
        assert!(answer_system
            .as_ref()
            .unwrap()
            .contains("Rust is a systems language."));
        // History precedes the new question
        assert_eq!(answer_messages.len(), 3);
        assert_eq!(answer_messages[0].content, "What is Rust?");
        assert_eq!(answer_messages[2].content, "Is it fast?");
    }

    #[tokio::test]
    async fn test_empty_answer_falls_back() {
        let llm = Arc::new(ScriptedLlm::new("unused", "   "));
        let chain = ConversationalChain::new(Arc::new(KeywordEmbedder), llm, 1);

        let answer = chain
            .ask(&test_index(), &[], "What is Rust?")
            .await
            .unwrap();
        assert_eq!(answer, NO_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        struct FailingLlm;

        #[async_trait]
        impl LlmProvider for FailingLlm {
            async fn complete(&self, _: Option<&str>, _: &[ChatMessage]) -> Result<String> {
                Err(Error::Llm("backend unavailable".to_string()))
            }
            async fn health_check(&self) -> Result<bool> {
                Ok(false)
            }
            fn name(&self) -> &str {
                "failing-test"
            }
            fn model(&self) -> &str {
                "none"
            }
        }

        let chain = ConversationalChain::new(Arc::new(KeywordEmbedder), Arc::new(FailingLlm), 1);
        let err = chain.ask(&test_index(), &[], "What is Rust?").await;
        assert!(matches!(err, Err(Error::Llm(_))));
    }
}
