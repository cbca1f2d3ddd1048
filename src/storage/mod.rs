//! Key-value storage standing in for browser `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Preference caches persist whole JSON documents under a single key each.
//! The store is injected so callers can swap the on-disk [`FileStore`] for a
//! [`MemoryStore`] in tests.
//!
//! ERROR HANDLING
//! ==============
//! [`load_json`] and [`save_json`] are best-effort: unavailable storage and
//! corrupt documents are logged at `warn` and read back as "nothing stored".

pub mod file;
pub mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage is unavailable")]
    Unavailable,
}

/// Synchronous string store with `localStorage` semantics.
pub trait KvStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// Load a JSON value stored under `key`.
pub fn load_json<T: DeserializeOwned>(store: &(impl KvStore + ?Sized), key: &str) -> Option<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, key, "failed to read from storage");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, key, "discarding unparseable stored document");
            None
        }
    }
}

/// Save a JSON value under `key`, replacing whatever was stored.
pub fn save_json<T: Serialize>(store: &(impl KvStore + ?Sized), key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, key, "failed to serialize document for storage");
            return;
        }
    };
    if let Err(e) = store.set_item(key, &raw) {
        warn!(error = %e, key, "failed to write to storage");
    }
}

/// Remove `key` from storage.
pub fn remove_key(store: &(impl KvStore + ?Sized), key: &str) {
    if let Err(e) = store.remove_item(key) {
        warn!(error = %e, key, "failed to remove from storage");
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
