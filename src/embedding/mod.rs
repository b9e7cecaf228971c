//! Text embedding
//!
//! An [`EmbeddingProvider`] turns text into a fixed-length vector. The store
//! only depends on the trait; [`WordVectors`] is the bundled implementation
//! that averages pre-trained word vectors.

mod word_vectors;

pub use word_vectors::WordVectors;

use std::path::PathBuf;

/// Errors raised while loading an embedding table
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read embedding table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Embedding table {name} has no usable word vectors")]
    Empty { name: String },
}

/// Deterministic text -> vector mapping
pub trait EmbeddingProvider: Send + Sync + 'static {
    /// Embed `text`. Always returns `dimensionality()` values.
    fn embed(&self, text: &str) -> Vec<f64>;

    /// Length of every vector returned by `embed`
    fn dimensionality(&self) -> usize;

    /// Number of distinct words the provider knows
    fn vocabulary_size(&self) -> usize;
}
