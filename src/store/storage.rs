// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Durable slot holding the store's snapshot.
//!
//! The store loads the slot once when opened and rewrites it wholesale
//! after every mutation. Implementations only move text around; encoding
//! lives in `snapshot`.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::snapshot::STORAGE_KEY;

/// Failure reading or writing the snapshot slot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single named slot of text
pub trait SnapshotStorage {
    /// Read the slot. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the slot's contents
    fn save(&mut self, contents: &str) -> Result<(), StorageError>;
}

/// Snapshot slot backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Use the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `<dir>/midi-editor-data.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{}.json", STORAGE_KEY)))
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SnapshotStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        atomic_write(&self.path, contents).map_err(|e| self.io_error(e))
    }
}

/// Write through a sibling temp file so readers never see a partial snapshot
fn atomic_write(path: &Path, contents: &str) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");

    {
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(contents.as_bytes())?;
        tmp_file.sync_all()?;
    }

    fs::rename(&tmp_path, path)
}

/// In-process snapshot slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Option<String>,
    saves: usize,
}

impl MemoryStorage {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `contents`
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Some(contents.into()),
            saves: 0,
        }
    }

    /// Get the current contents
    pub fn contents(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Number of saves since creation
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.clone())
    }

    fn save(&mut self, contents: &str) -> Result<(), StorageError> {
        self.slot = Some(contents.to_string());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_missing_file() {
        let dir = tempdir().unwrap();
        let storage = JsonFileStorage::in_dir(dir.path());

        assert_eq!(storage.path(), dir.path().join("midi-editor-data.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let mut storage = JsonFileStorage::in_dir(dir.path().join("nested"));

        storage.save("{\"a\":1}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{\"a\":1}"));

        storage.save("{\"a\":2}").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("{\"a\":2}"));
        assert!(!storage.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_file_storage_unreadable_path() {
        let dir = tempdir().unwrap();
        // A directory where the file should be
        let storage = JsonFileStorage::new(dir.path());

        assert!(matches!(storage.load(), Err(StorageError::Io { .. })));
    }

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());

        storage.save("one").unwrap();
        storage.save("two").unwrap();

        assert_eq!(storage.contents(), Some("two"));
        assert_eq!(storage.save_count(), 2);
        assert_eq!(MemoryStorage::with_contents("x").load().unwrap().as_deref(), Some("x"));
    }
}
