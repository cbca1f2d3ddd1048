//! [`KvStore`] persisted as one JSON object on disk.
//!
//! DESIGN
//! ======
//! The whole key space is a single `{"key": "value"}` document. Every write
//! re-reads the file, applies the change and replaces the file through a
//! temporary sibling, so a crash mid-write leaves the previous document in
//! place. Concurrent writers are last-write-wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{KvStore, StorageError};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Current document for a write. A corrupt file is replaced rather than
    /// blocking every later write.
    fn document_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_document() {
            Err(StorageError::Json(e)) => {
                warn!(error = %e, path = %self.path.display(), "replacing corrupt storage file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(document)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KvStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut document = self.document_for_write()?;
        document.insert(key.to_owned(), value.to_owned());
        self.write_document(&document)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut document = self.document_for_write()?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&document)
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
