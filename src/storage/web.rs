//! Browser `localStorage`

use web_sys::{Storage, window};

use super::{StorageBackend, StorageError};

/// Storage backed by the page's `window.localStorage`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Bind to the current window's local storage.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Backend`] when there is no window or storage is disabled.
    pub fn new() -> Result<Self, StorageError> {
        let storage = window()
            .ok_or_else(|| StorageError::Backend("no window available".to_string()))?
            .local_storage()
            .map_err(|err| StorageError::Backend(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Backend("localStorage is unavailable".to_string()))?;

        Ok(Self { storage })
    }
}

impl StorageBackend for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage
            .get_item(key)
            .map_err(|err| StorageError::Backend(format!("{err:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|err| StorageError::Backend(format!("{err:?}")))
    }
}
