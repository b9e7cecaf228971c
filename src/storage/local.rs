//! Local filesystem storage
//!
//! Features:
//! - Files live under a single root directory
//! - Whole-file writes go through a temp file and a rename, so readers see
//!   either the old snapshot or the new one
//! - Optional simulated disk latency for local experiments

use super::*;
use async_trait::async_trait;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;

/// Suffix of the scratch file a write goes through before the rename
const TEMP_SUFFIX: &str = ".tmp";

/// Configuration for local storage behavior
#[derive(Debug, Clone)]
pub struct LocalStorageConfig {
    /// Simulated fsync latency
    pub fsync_latency: Duration,
    /// Simulated read latency
    pub read_latency: Duration,
    /// Random latency variance (0.0 - 1.0)
    pub latency_variance: f64,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            // Roughly a network-attached SSD
            fsync_latency: Duration::from_millis(3),
            read_latency: Duration::from_micros(100),
            latency_variance: 0.2,
        }
    }
}

impl LocalStorageConfig {
    /// No artificial latency (tests, production)
    pub fn fast() -> Self {
        Self {
            fsync_latency: Duration::ZERO,
            read_latency: Duration::ZERO,
            latency_variance: 0.0,
        }
    }

    /// Config for realistic simulation
    pub fn realistic() -> Self {
        Self::default()
    }
}

/// Filesystem-backed [`BlockStorage`]
pub struct LocalStorage {
    root: PathBuf,
    config: LocalStorageConfig,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, config: LocalStorageConfig) -> std::io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self { root, config })
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    async fn simulate_latency(&self, base: Duration) {
        // Always yield so a single-threaded runtime keeps making progress
        tokio::task::yield_now().await;

        if base.is_zero() {
            return;
        }

        let variance = self.config.latency_variance;
        let jitter = if variance > 0.0 {
            let factor = 1.0 + (rand::random::<f64>() * 2.0 - 1.0) * variance;
            base.mul_f64(factor)
        } else {
            base
        };

        sleep(jitter).await;
    }
}

#[async_trait]
impl BlockStorage for LocalStorage {
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        tokio::task::yield_now().await;
        let full_path = self.full_path(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut temp_path = full_path.clone().into_os_string();
        temp_path.push(TEMP_SUFFIX);
        let temp_path = PathBuf::from(temp_path);

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&temp_path, &full_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(())
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.simulate_latency(self.config.read_latency).await;

        let full_path = self.full_path(path);
        if !full_path.exists() {
            return Err(StorageError::NotFound {
                key: path.to_string(),
            });
        }

        let data = fs::read(&full_path)?;
        Ok(data)
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        tokio::task::yield_now().await;
        Ok(self.full_path(path).is_file())
    }

    async fn sync(&self, path: &str) -> StorageResult<()> {
        self.simulate_latency(self.config.fsync_latency).await;

        let full_path = self.full_path(path);
        if full_path.exists() {
            let file = File::open(&full_path)?;
            file.sync_all()?;
        }

        // Make the rename itself durable
        if let Some(parent) = full_path.parent() {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    fn root_path(&self) -> &Path {
        &self.root
    }
}
