//! LLM provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ChatMessage;

/// Trait for chat-style LLM completion
///
/// The conversational chain makes two differently shaped calls (query
/// rewriting and answer generation), so the seam is a generic chat
/// completion: optional system instruction plus an ordered message list.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the given conversation
    async fn complete(
        &self,
        system_instruction: Option<&str>,
        messages: &[ChatMessage],
    ) -> Result<String>;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model being used
    fn model(&self) -> &str;
}
