//! Persisted key/value storage for client-side state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Plays the role browser `localStorage` plays for a web client: a flat map
//! of string keys to string values that survives process restarts. The
//! session store is the only writer today.
//!
//! DESIGN
//! ======
//! Multi-key writes and removals are atomic. `FileStore` rewrites the whole
//! map into a sibling temp file and renames it over the target, so a crash
//! never leaves half of a batch on disk.

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed at {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// The backing file exists but is not a JSON string map.
    #[error("storage file {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Flat string map with atomic batch mutation.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read or parsed.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write every pair, or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch could not be persisted.
    fn put_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError>;

    /// Remove every listed key, or none of them. Missing keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal could not be persisted.
    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError>;

    /// Drop every key at once. Last resort when a targeted removal fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium could not be emptied.
    fn purge(&self) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put_many(&self, batch: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for (key, value) in batch {
            entries.insert((*key).to_owned(), (*value).to_owned());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    fn purge(&self) -> Result<(), StorageError> {
        self.entries.lock().map_err(|_| StorageError::Poisoned)?.clear();
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON-file-backed store. The mutex serializes read-modify-write cycles
/// within one process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, error: &std::io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), message: error.to_string() }
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(error) => return Err(self.io_error(&error)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|error| StorageError::Corrupt { path: self.path.clone(), message: error.to_string() })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
        }
        let rendered = serde_json::to_string_pretty(map)
            .map_err(|error| StorageError::Corrupt { path: self.path.clone(), message: error.to_string() })?;
        let tmp = self.path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));
        std::fs::write(&tmp, rendered).map_err(|e| self.io_error(&e))?;
        if let Err(error) = std::fs::rename(&tmp, &self.path) {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                tracing::debug!(path = %tmp.display(), error = %cleanup, "temp file cleanup failed");
            }
            return Err(self.io_error(&error));
        }
        Ok(())
    }

    /// Load the map for mutation. A corrupt file is reported as dirty so the
    /// next write replaces it instead of failing forever.
    fn read_map_for_write(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        match self.read_map() {
            Ok(map) => Ok((map, false)),
            Err(StorageError::Corrupt { message, .. }) => {
                tracing::warn!(path = %self.path.display(), %message, "discarding corrupt storage file");
                Ok((BTreeMap::new(), true))
            }
            Err(error) => Err(error),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_map()?.remove(key))
    }

    fn put_many(&self, batch: &[(&str, &str)]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (mut map, _) = self.read_map_for_write()?;
        for (key, value) in batch {
            map.insert((*key).to_owned(), (*value).to_owned());
        }
        self.write_map(&map)
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let (mut map, mut dirty) = self.read_map_for_write()?;
        for key in keys {
            dirty |= map.remove(*key).is_some();
        }
        if !dirty {
            return Ok(());
        }
        self.write_map(&map)
    }

    /// Deletes the backing file outright.
    fn purge(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(self.io_error(&error)),
        }
    }
}
