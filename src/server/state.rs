//! Application state for the HTTP server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::ConversationalChain;
use crate::providers::{EmbeddingProvider, GeminiEmbedder, GeminiLlm, LlmProvider};
use crate::server::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding provider
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider
    llm_provider: Arc<dyn LlmProvider>,
    /// Per-session state
    sessions: SessionStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with the hosted Gemini backend
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!(
            "Initializing application state (llm: {}, embeddings: {})",
            config.gemini.generate_model,
            config.gemini.embed_model
        );

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(GeminiEmbedder::new(&config.gemini)?);
        let llm: Arc<dyn LlmProvider> = Arc::new(GeminiLlm::new(&config.gemini)?);

        Ok(Self::with_providers(config, embedder, llm))
    }

    /// Create application state with explicit providers
    pub fn with_providers(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        llm_provider: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider,
                llm_provider,
                sessions: SessionStore::new(),
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Get the session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Build the conversational chain for the configured providers
    pub fn chain(&self) -> ConversationalChain {
        ConversationalChain::new(
            Arc::clone(&self.inner.embedding_provider),
            Arc::clone(&self.inner.llm_provider),
            self.inner.config.retrieval.top_k,
        )
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
