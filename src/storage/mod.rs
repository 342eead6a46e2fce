//! Storage
//!
//! Key-value backends the cart is persisted to. The cart only ever uses a single
//! key, but backends are shared: two processes writing the same key race and the
//! last write wins.

use std::io;

use thiserror::Error;

pub mod file;
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use file::FileStorage;
pub use memory::MemoryStorage;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would exceed the backend's quota.
    #[error("storage quota exceeded writing {key}: {requested} bytes requested, {limit} bytes allowed")]
    QuotaExceeded {
        /// Key being written
        key: String,
        /// Total bytes the backend would hold after the write
        requested: usize,
        /// Configured quota in bytes
        limit: usize,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Underlying IO failure.
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Error reported by a platform backend.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A string key-value store.
pub trait StorageBackend {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the write is rejected or fails.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: StorageBackend + ?Sized> StorageBackend for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

impl<S: StorageBackend + ?Sized> StorageBackend for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
