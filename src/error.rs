//! Unified error types for vecstash
//!
//! Each layer keeps its own error enum ([`StorageError`], [`LoadError`]);
//! this module folds them into the single type returned by store operations.

use crate::embedding::LoadError;
use crate::storage::StorageError;

/// Main error type for vecstash operations
#[derive(Debug, thiserror::Error)]
pub enum VecstashError {
    /// Embedding table could not be loaded
    #[error("Embedding load error: {0}")]
    Load(#[from] LoadError),

    /// Snapshot read/write failed or the snapshot is corrupt.
    /// A failed save does not undo the in-memory mutation.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input data
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for vecstash operations
pub type Result<T> = std::result::Result<T, VecstashError>;

impl VecstashError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for storage failures and corrupt snapshots
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
