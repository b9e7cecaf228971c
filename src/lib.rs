//! # vecstash
//!
//! A small, file-backed vector database. Documents are embedded by averaging
//! pre-trained word vectors and retrieved by exact cosine similarity.
//!
//! ## Architecture
//!
//! ```text
//! HTTP API (Axum) / CLI
//!     │
//!     ▼
//! VectorStore (one async mutex, full snapshot on every write)
//!     ├── EmbeddingProvider (WordVectors)
//!     └── BlockStorage (LocalStorage)
//! ```
//!
//! ## Features
//!
//! - **Exact search**: every query scores every record, no approximate index
//! - **Serialized access**: operations apply one at a time in submission order
//! - **Snapshot persistence**: the whole map is rewritten on each mutation
//!
//! ## Quick Start
//!
//! ```ignore
//! use vecstash::{Config, VectorStore, WordVectors};
//!
//! let config = Config::from_env()?;
//! let embedder = Arc::new(WordVectors::open(&config.embedding.path).await?);
//! let storage = Arc::new(config.storage.create_backend()?);
//! let store = VectorStore::open(embedder, storage, &config.storage.snapshot_file).await?;
//! store.upsert_text("a", "cats and dogs", Default::default()).await?;
//! let hits = store.query_text("feline pets", 1).await;
//! ```

pub mod api;
pub mod config;
pub mod defaults;
pub mod embedding;
pub mod error;
pub mod storage;
pub mod store;
pub mod types;

pub use config::Config;
pub use embedding::{EmbeddingProvider, LoadError, WordVectors};
pub use error::{Result, VecstashError};
pub use store::VectorStore;
pub use types::{BatchItem, BatchResult, Metadata, VectorMatch, VectorRecord};
