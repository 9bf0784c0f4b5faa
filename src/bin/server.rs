//! DocQuery server binary
//!
//! Run with: cargo run --bin docquery-server

use docquery::config::RagConfig;
use docquery::providers::{EmbeddingProvider, GeminiEmbedder};
use docquery::server::RagServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docquery=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration and the API key
    let mut config = RagConfig::load()?;
    config.gemini.resolve_api_key()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.gemini.generate_model);
    tracing::info!("  - Embedding model: {}", config.gemini.embed_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Retrieval top-k: {}", config.retrieval.top_k);

    // Pre-flight: warn early if the hosted backend is unreachable
    let embedder = GeminiEmbedder::new(&config.gemini)?;
    match embedder.health_check().await {
        Ok(true) => tracing::info!("Gemini API reachable"),
        _ => tracing::warn!("Gemini API not reachable; check GOOGLE_API_KEY and network access"),
    }

    let server = RagServer::new(config)?;

    println!("DocQuery server listening on http://{}", server.address());
    println!("  POST /rag-bot/process-pdf - Upload documents");
    println!("  POST /rag-bot/ask         - Ask questions");
    println!("  UI:  http://{}/ui/", server.address());

    server.start().await?;

    Ok(())
}
