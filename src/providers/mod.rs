//! Provider abstractions for embeddings and LLM completion
//!
//! Trait-based seams so the hosted Gemini backend can be swapped out (and
//! mocked in tests).

pub mod embedding;
pub mod gemini;
pub mod llm;

pub use embedding::EmbeddingProvider;
pub use gemini::{GeminiEmbedder, GeminiLlm};
pub use llm::LlmProvider;
