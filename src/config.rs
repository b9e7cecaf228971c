//! Configuration module

use crate::defaults::*;
use crate::error::{Result, VecstashError};
use crate::storage::local::{LocalStorage, LocalStorageConfig};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub api: ApiConfig,
}

impl Config {
    /// Load config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config from any key -> value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let storage = StorageConfig {
            root: lookup("STORAGE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_ROOT)),
            snapshot_file: lookup("SNAPSHOT_FILE")
                .unwrap_or_else(|| DEFAULT_SNAPSHOT_FILE.to_string()),
            simulate_latency: lookup("SIMULATE_LATENCY")
                .map(|v| v == "true")
                .unwrap_or(false),
        };

        let embedding = EmbeddingConfig {
            path: lookup("EMBEDDINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EMBEDDINGS_PATH)),
        };

        let api = ApiConfig {
            host: lookup("API_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: lookup("API_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            default_top_k: lookup("DEFAULT_TOP_K")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOP_K),
            max_top_k: lookup("MAX_TOP_K")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_TOP_K),
        };
        api.validate()?;

        Ok(Self {
            storage,
            embedding,
            api,
        })
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub root: PathBuf,
    pub snapshot_file: String,
    pub simulate_latency: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_STORAGE_ROOT),
            snapshot_file: DEFAULT_SNAPSHOT_FILE.to_string(),
            simulate_latency: false,
        }
    }
}

impl StorageConfig {
    /// Create the storage backend from config
    pub fn create_backend(&self) -> Result<LocalStorage> {
        let config = if self.simulate_latency {
            LocalStorageConfig::realistic()
        } else {
            LocalStorageConfig::fast()
        };

        LocalStorage::new(&self.root, config).map_err(|e| {
            VecstashError::config(format!(
                "cannot use storage root {}: {}",
                self.root.display(),
                e
            ))
        })
    }
}

/// Embedding table configuration
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub path: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_EMBEDDINGS_PATH),
        }
    }
}

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// `top_k` used when a query omits it
    pub default_top_k: usize,
    /// Queries asking for more are rejected
    pub max_top_k: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            default_top_k: DEFAULT_TOP_K,
            max_top_k: DEFAULT_MAX_TOP_K,
        }
    }
}

impl ApiConfig {
    fn validate(&self) -> Result<()> {
        if self.default_top_k == 0 {
            return Err(VecstashError::config("DEFAULT_TOP_K must be at least 1"));
        }
        if self.default_top_k > self.max_top_k {
            return Err(VecstashError::config(format!(
                "DEFAULT_TOP_K ({}) exceeds MAX_TOP_K ({})",
                self.default_top_k, self.max_top_k
            )));
        }
        Ok(())
    }
}
