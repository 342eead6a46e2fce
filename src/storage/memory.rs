//! In-memory storage

use rustc_hash::FxHashMap;

use super::{StorageBackend, StorageError};

/// Hash map backed storage with an optional byte quota.
///
/// The quota counts the bytes of every stored key and value, mirroring how
/// browser storage limits are enforced.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes beyond `bytes`.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            quota: Some(bytes),
        }
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of bytes currently held.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(limit) = self.quota {
            let replaced = self
                .entries
                .get(key)
                .map_or(0, |existing| key.len() + existing.len());

            let requested = self.used_bytes() - replaced + key.len() + value.len();

            if requested > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}
