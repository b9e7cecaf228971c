//! Record and result types shared by the store, the API and the CLI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Free-form string metadata attached to a record
pub type Metadata = HashMap<String, String>;

/// One stored item. Also the unit of the on-disk snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f64>,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Last write time, assigned by the store
    pub timestamp: DateTime<Utc>,
}

impl VectorRecord {
    pub(crate) fn new(id: String, vector: Vec<f64>, text: String, metadata: Metadata) -> Self {
        Self {
            id,
            vector,
            text,
            metadata,
            timestamp: Utc::now(),
        }
    }
}

/// A ranked query hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub text: String,
    pub metadata: Metadata,
    /// Cosine similarity with the query vector
    pub score: f64,
}

impl VectorMatch {
    pub(crate) fn from_record(record: &VectorRecord, score: f64) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            metadata: record.metadata.clone(),
            score,
        }
    }
}

/// Input item of a batch text upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl BatchItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Summary of a batch upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub successful: usize,
    pub failed: usize,
    /// One message per failed item, in input order
    pub errors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
