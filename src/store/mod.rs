//! Local key-value storage.
//!
//! All persistent state (accounts, the signed-in user, notes) lives as
//! string values under string keys. [`FileStorage`] keeps them in one JSON
//! file; [`MemoryStorage`] is the stand-in when that file cannot be used.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Name of the storage file inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

const PROBE_KEY: &str = "__inkwell_test__";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed storage file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String-keyed storage with the shape of a browser's local storage.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error if the value cannot be persisted.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    /// Returns an error if the removal cannot be persisted.
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process storage, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage persisted as a JSON object in `<dir>/storage.json`.
///
/// The whole file is rewritten after every mutation.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or start) the storage file in `dir`.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or an existing
    /// file cannot be read or parsed.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = dir.join(STORAGE_FILE);
        let items: BTreeMap<String, String> = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = items.len(), "opened storage");
        Ok(Self { path, items })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.items).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_owned(), value.to_owned());
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Open file storage in `dir`, falling back to memory if it is unusable.
///
/// The file store is probed with a throwaway write before it is trusted.
pub fn open_storage(dir: &Path) -> Box<dyn Storage> {
    match FileStorage::open(dir).and_then(probe) {
        Ok(storage) => Box::new(storage),
        Err(err) => {
            warn!("storage unavailable, notes will not persist: {err}");
            Box::new(MemoryStorage::new())
        }
    }
}

fn probe(mut storage: FileStorage) -> Result<FileStorage, StoreError> {
    storage.set_item(PROBE_KEY, "1")?;
    storage.remove_item(PROBE_KEY)?;
    Ok(storage)
}
