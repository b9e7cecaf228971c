//! Centralized default values and constants
//!
//! Every environment-driven setting in [`crate::config`] falls back to one of
//! these.

// ============================================================================
// Storage
// ============================================================================

/// Directory holding the snapshot file
pub const DEFAULT_STORAGE_ROOT: &str = "./data";

/// Snapshot file name, relative to the storage root
pub const DEFAULT_SNAPSHOT_FILE: &str = "vectors.json";

// ============================================================================
// Embeddings
// ============================================================================

/// Word-vector table loaded at startup
pub const DEFAULT_EMBEDDINGS_PATH: &str = "./data/word_vectors.txt";

// ============================================================================
// Server Configuration
// ============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

// ============================================================================
// Search Parameters
// ============================================================================

/// Number of results when a query does not say
pub const DEFAULT_TOP_K: usize = 10;

/// Largest `top_k` the API accepts
pub const DEFAULT_MAX_TOP_K: usize = 1000;
