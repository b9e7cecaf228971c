//! Storage abstraction layer
//!
//! The store only needs whole-file reads and writes against a flat namespace
//! of paths. [`BlockStorage`] captures that contract so the store can run
//! against the local filesystem in production and against wrapped or
//! failure-injecting backends in tests.

pub mod local;

use async_trait::async_trait;
use std::path::Path;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {key}")]
    NotFound { key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Block storage trait
///
/// Paths are relative to the backend's root. Writes replace the whole file.
#[async_trait]
pub trait BlockStorage: Send + Sync + 'static {
    /// Replace the contents of `path` with `data`
    /// Does NOT guarantee durability until sync() is called
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()>;

    /// Read entire file. Missing files are `StorageError::NotFound`.
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Check if file exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Sync file to durable storage (fsync)
    async fn sync(&self, path: &str) -> StorageResult<()>;

    /// Get the root path (for diagnostics)
    fn root_path(&self) -> &Path;
}
