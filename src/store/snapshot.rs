//! Snapshot persistence
//!
//! The snapshot is a JSON array holding every record. It is rewritten in
//! full on each save; there is no log and no version field.

use crate::storage::{BlockStorage, StorageError, StorageResult};
use crate::types::VectorRecord;
use std::collections::HashMap;

/// Load the record map. A missing snapshot is an empty map.
pub(crate) async fn load_snapshot(
    storage: &dyn BlockStorage,
    path: &str,
) -> StorageResult<HashMap<String, VectorRecord>> {
    if !storage.exists(path).await? {
        return Ok(HashMap::new());
    }

    let data = storage.read(path).await?;
    decode(&data)
}

/// Write the whole record map and sync it
pub(crate) async fn save_snapshot(
    storage: &dyn BlockStorage,
    path: &str,
    records: &HashMap<String, VectorRecord>,
) -> StorageResult<()> {
    let data = encode(records)?;

    storage.write(path, &data).await?;
    storage.sync(path).await?;

    Ok(())
}

fn encode(records: &HashMap<String, VectorRecord>) -> StorageResult<Vec<u8>> {
    // Sorted so unchanged maps produce identical files
    let mut sorted: Vec<&VectorRecord> = records.values().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    serde_json::to_vec(&sorted).map_err(|e| StorageError::Serialization(e.to_string()))
}

fn decode(data: &[u8]) -> StorageResult<HashMap<String, VectorRecord>> {
    let records: Vec<VectorRecord> =
        serde_json::from_slice(data).map_err(|e| StorageError::Serialization(e.to_string()))?;

    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(previous) = map.insert(record.id.clone(), record) {
            tracing::warn!(id = %previous.id, "Duplicate id in snapshot, keeping the later record");
        }
    }

    Ok(map)
}
