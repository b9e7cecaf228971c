//! vecstash server entry point

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vecstash::{api, Config, VectorStore, WordVectors};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,vecstash=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting vecstash server...");

    // Load config
    let config = Config::from_env()?;
    tracing::info!("Loaded config: {:?}", config);

    // Create storage backend
    let storage = Arc::new(config.storage.create_backend()?);
    tracing::info!(root = %config.storage.root.display(), "Storage backend initialized");

    // Load embeddings
    let embedder = Arc::new(WordVectors::open(&config.embedding.path).await?);

    // Open store
    let store = VectorStore::open(embedder, storage, config.storage.snapshot_file.clone()).await?;
    tracing::info!("Vector store ready");

    // Start API server
    api::serve(Arc::new(store), config.api).await?;

    Ok(())
}
