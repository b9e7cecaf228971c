//! Shared test utilities for vecstash
//!
//! This module provides:
//! - Temp storage creation and reopening
//! - A small deterministic word-vector table
//! - Failing storage wrapper for error injection
//! - Seeded vector generation

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

use vecstash::storage::local::{LocalStorage, LocalStorageConfig};
use vecstash::storage::{BlockStorage, StorageError, StorageResult};
use vecstash::{VectorStore, WordVectors};

/// Snapshot path used by the integration tests
pub const SNAPSHOT: &str = "vectors.json";

/// Animals cluster on the first axis, vehicles on the third
pub const WORD_TABLE: &str = "\
cats 0.90 0.10 0.00
dogs 0.80 0.20 0.00
feline 0.85 0.15 0.05
pets 0.80 0.25 0.00
kitten 0.95 0.05 0.00
car 0.00 0.10 0.90
engines 0.10 0.00 0.80
truck 0.05 0.15 0.85
road 0.10 0.50 0.40
";

pub fn word_vectors() -> Arc<WordVectors> {
    Arc::new(WordVectors::parse(WORD_TABLE).unwrap())
}

/// Create a temporary storage for testing
pub fn temp_storage() -> (TempDir, Arc<LocalStorage>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(LocalStorage::new(temp_dir.path(), LocalStorageConfig::fast()).unwrap());
    (temp_dir, storage)
}

/// Create a temporary storage with path for reopening
pub fn temp_storage_with_path() -> (TempDir, PathBuf, Arc<LocalStorage>) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().to_path_buf();
    let storage = Arc::new(LocalStorage::new(&path, LocalStorageConfig::fast()).unwrap());
    (temp_dir, path, storage)
}

/// Reopen storage at the same path
pub fn reopen_storage(path: &Path) -> Arc<LocalStorage> {
    Arc::new(LocalStorage::new(path, LocalStorageConfig::fast()).unwrap())
}

/// Open a store over `storage` with the test word table
pub async fn open_store(storage: Arc<dyn BlockStorage>) -> VectorStore {
    VectorStore::open(word_vectors(), storage, SNAPSHOT)
        .await
        .unwrap()
}

/// Deterministic vector for a seed, components in [-1, 1)
pub fn seeded_vector(dims: usize, seed: u64) -> Vec<f64> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..dims).map(|_| rng.gen::<f64>() * 2.0 - 1.0).collect()
}

fn io_error(msg: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, msg)
}

/// Failure injection mode for FailingStorage
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FailureMode {
    /// No failures
    None,
    /// Fail only write operations
    FailWrites,
    /// Fail only sync operations
    FailSync,
    /// Fail only read operations
    FailReads,
}

/// Storage wrapper that can inject failures and counts calls
pub struct FailingStorage {
    inner: Arc<dyn BlockStorage>,
    failure_mode: RwLock<FailureMode>,
    enabled: AtomicBool,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl FailingStorage {
    pub fn new(inner: Arc<dyn BlockStorage>) -> Self {
        Self {
            inner,
            failure_mode: RwLock::new(FailureMode::None),
            enabled: AtomicBool::new(false),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Set the failure mode
    pub fn set_failure_mode(&self, mode: FailureMode) {
        *self.failure_mode.write().unwrap() = mode;
        self.enabled.store(mode != FailureMode::None, Ordering::SeqCst);
    }

    /// Disable all failures
    pub fn disable_failures(&self) {
        self.set_failure_mode(FailureMode::None);
    }

    fn should_fail(&self, mode: FailureMode) -> bool {
        self.enabled.load(Ordering::SeqCst) && *self.failure_mode.read().unwrap() == mode
    }

    /// Number of write calls seen, including failed ones
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of read calls seen, including failed ones
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlockStorage for FailingStorage {
    async fn write(&self, path: &str, data: &[u8]) -> StorageResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.should_fail(FailureMode::FailWrites) {
            return Err(StorageError::Io(io_error("Injected write failure")));
        }
        self.inner.write(path, data).await
    }

    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.should_fail(FailureMode::FailReads) {
            return Err(StorageError::Io(io_error("Injected read failure")));
        }
        self.inner.read(path).await
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.inner.exists(path).await
    }

    async fn sync(&self, path: &str) -> StorageResult<()> {
        if self.should_fail(FailureMode::FailSync) {
            return Err(StorageError::Io(io_error("Injected sync failure")));
        }
        self.inner.sync(path).await
    }

    fn root_path(&self) -> &Path {
        self.inner.root_path()
    }
}

/// Assert scores are sorted highest first
pub fn assert_descending(scores: &[f64]) {
    for pair in scores.windows(2) {
        assert!(
            pair[0] >= pair[1],
            "scores not descending: {:?}",
            scores
        );
    }
}
