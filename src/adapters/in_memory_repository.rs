//! In-memory experiment repository for testing.
//!
//! This adapter provides a pure in-memory implementation of ExperimentRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, experiment::ExperimentRecord, ports::ExperimentRepository};

/// In-memory repository for testing.
///
/// Records are stored as MessagePack bytes so a load exercises the same
/// serialization path as the file repository.
///
/// # Thread Safety
///
/// All clones share the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of records currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored records.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if a record exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl ExperimentRepository for InMemoryRepository {
    fn save(&self, record: &ExperimentRecord, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(record).map_err(|e| Error::SerializationContext {
            operation: "serialize experiment for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ExperimentRecord> {
        let storage = self.storage();
        let bytes = storage.get(&key(path)).ok_or_else(|| Error::RecordNotFound {
            path: path.display().to_string(),
        })?;

        let record: ExperimentRecord =
            rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
                operation: "deserialize experiment from in-memory storage".to_string(),
                message: e.to_string(),
            })?;

        record.check_version()?;
        Ok(record)
    }
}
