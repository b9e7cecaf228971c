//! The vector store
//!
//! Owns the id -> record map and serializes every operation through one
//! async mutex. Mutations that change the map write a full snapshot before
//! the lock is released, so no caller ever sees a half-applied change and
//! the snapshot on disk always reflects a complete map.
//!
//! ```ignore
//! let embedder = Arc::new(WordVectors::open("glove.txt").await?);
//! let storage = Arc::new(LocalStorage::new("./data", LocalStorageConfig::fast())?);
//! let store = VectorStore::open(embedder, storage, "vectors.json").await?;
//!
//! store.upsert_text("a", "cats and dogs", Metadata::new()).await?;
//! let hits = store.query_text("feline pets", 5).await;
//! ```

mod search;
mod snapshot;

pub use search::cosine_similarity;

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, VecstashError};
use crate::storage::BlockStorage;
use crate::types::{BatchItem, BatchResult, Metadata, VectorMatch, VectorRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Keyed vector store with snapshot persistence
pub struct VectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    storage: Arc<dyn BlockStorage>,
    path: String,
    records: Mutex<HashMap<String, VectorRecord>>,
}

impl VectorStore {
    /// Open a store over the snapshot at `path`.
    ///
    /// A missing snapshot starts an empty store. A snapshot that exists but
    /// cannot be read or parsed is a persistence error.
    pub async fn open(
        embedder: Arc<dyn EmbeddingProvider>,
        storage: Arc<dyn BlockStorage>,
        path: impl Into<String>,
    ) -> Result<Self> {
        let path = path.into();
        let records = snapshot::load_snapshot(&*storage, &path).await?;

        tracing::info!(
            path = %path,
            records = records.len(),
            dims = embedder.dimensionality(),
            "Opened vector store"
        );

        Ok(Self {
            embedder,
            storage,
            path,
            records: Mutex::new(records),
        })
    }

    /// Number of stored records
    pub async fn count(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.count().await == 0
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.records.lock().await.contains_key(id)
    }

    /// Insert or overwrite `id` with an explicit vector.
    ///
    /// A blank id is `InvalidInput` and changes nothing. If the snapshot
    /// write fails the record stays in memory and the error is returned.
    pub async fn upsert(
        &self,
        id: impl Into<String>,
        vector: Vec<f64>,
        text: impl Into<String>,
        metadata: Metadata,
    ) -> Result<()> {
        let id = id.into();
        check_id(&id)?;
        let record = VectorRecord::new(id, vector, text.into(), metadata);

        let mut records = self.records.lock().await;
        tracing::debug!(id = %record.id, dims = record.vector.len(), "Upserting record");
        records.insert(record.id.clone(), record);
        self.persist(&records).await
    }

    /// Embed `text` and upsert it
    pub async fn upsert_text(
        &self,
        id: impl Into<String>,
        text: impl Into<String>,
        metadata: Metadata,
    ) -> Result<()> {
        let text = text.into();
        let vector = self.embedder.embed(&text);
        self.upsert(id, vector, text, metadata).await
    }

    /// Embed and upsert every item in order, then write one snapshot.
    ///
    /// Items with a blank id are rejected and reported in `errors`; the
    /// rest of the batch still goes in.
    pub async fn batch_upsert_texts(&self, items: Vec<BatchItem>) -> Result<BatchResult> {
        let prepared: Vec<(BatchItem, Vec<f64>)> = items
            .into_iter()
            .map(|item| {
                let vector = self.embedder.embed(&item.text);
                (item, vector)
            })
            .collect();

        let mut successful = 0usize;
        let mut errors = Vec::new();

        let mut records = self.records.lock().await;
        for (position, (item, vector)) in prepared.into_iter().enumerate() {
            if let Err(e) = check_id(&item.id) {
                errors.push(format!("item {position}: {e}"));
                continue;
            }

            let record = VectorRecord::new(item.id, vector, item.text, item.metadata);
            records.insert(record.id.clone(), record);
            successful += 1;
        }

        tracing::debug!(successful, failed = errors.len(), "Batch upsert applied");

        if successful > 0 {
            self.persist(&records).await?;
        }

        Ok(BatchResult {
            successful,
            failed: errors.len(),
            errors,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Copy of the record for `id`
    pub async fn get(&self, id: &str) -> Option<VectorRecord> {
        self.records.lock().await.get(id).cloned()
    }

    /// Up to `top_k` records ranked by cosine similarity to `vector`.
    ///
    /// Every record is scored; the order of records with equal scores is
    /// unspecified.
    pub async fn query(&self, vector: &[f64], top_k: usize) -> Vec<VectorMatch> {
        let records = self.records.lock().await;
        search::rank(records.values(), vector, top_k)
    }

    /// Embed `text` and query with it
    pub async fn query_text(&self, text: &str, top_k: usize) -> Vec<VectorMatch> {
        let vector = self.embedder.embed(text);
        self.query(&vector, top_k).await
    }

    /// Copies of all records, in no particular order
    pub async fn query_all(&self) -> Vec<VectorRecord> {
        self.records.lock().await.values().cloned().collect()
    }

    /// Remove `id`. Returns false, without touching storage, if it was absent.
    pub async fn remove_at(&self, id: &str) -> Result<bool> {
        let mut records = self.records.lock().await;
        if records.remove(id).is_none() {
            return Ok(false);
        }

        tracing::debug!(id = %id, "Removed record");
        self.persist(&records).await?;
        Ok(true)
    }

    /// Remove every record. An already empty store is left untouched.
    pub async fn remove_all(&self) -> Result<()> {
        let mut records = self.records.lock().await;
        if records.is_empty() {
            return Ok(());
        }

        let removed = records.len();
        records.clear();
        tracing::info!(removed, "Cleared vector store");
        self.persist(&records).await
    }

    /// The embedding provider used by the text operations
    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        &*self.embedder
    }

    /// Write the snapshot. Called with the map lock held.
    async fn persist(&self, records: &HashMap<String, VectorRecord>) -> Result<()> {
        match snapshot::save_snapshot(&*self.storage, &self.path, records).await {
            Ok(()) => {
                tracing::debug!(path = %self.path, records = records.len(), "Saved snapshot");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %self.path, error = %e, "Failed to save snapshot");
                Err(e.into())
            }
        }
    }
}

/// Ids may be any string except an empty or all-whitespace one
fn check_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(VecstashError::invalid_input("id must not be blank"));
    }
    Ok(())
}
