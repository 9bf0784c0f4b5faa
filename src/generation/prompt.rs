//! Prompt templates for the conversational RAG flow

use crate::retrieval::VectorSearchResult;

/// System prompt for answer generation. The `{context}` placeholder is
/// filled with the retrieved chunks.
const ANSWER_SYSTEM_PROMPT: &str = "You are 'DocQuery AI', a professional AI assistant. \
Answer the user's questions based on the provided document context. \
If the context doesn't contain the answer, say so. Be concise and polite.\n\nContext:\n";

/// Instruction appended after the conversation when rewriting a follow-up
/// question into a standalone search query.
const REPHRASE_INSTRUCTION: &str = "Given the above conversation, generate a search query \
to look up in order to get information relevant to the conversation";

/// Prompt builder for the retrieval chain
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from search results
    pub fn build_context(results: &[VectorSearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "[{}] {}\n{}\n\n",
                i + 1,
                result.chunk.source.format_ref(),
                result.chunk.content
            ));
        }

        context
    }

    /// System instruction for answer generation over the given context
    pub fn answer_system_prompt(context: &str) -> String {
        format!("{}{}", ANSWER_SYSTEM_PROMPT, context)
    }

    /// The rewrite instruction sent as the final user message when turning
    /// a follow-up question into a standalone query
    pub fn rephrase_instruction() -> &'static str {
        REPHRASE_INSTRUCTION
    }
}
