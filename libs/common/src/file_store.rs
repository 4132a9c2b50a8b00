//! File-backed key-value store
//!
//! This module persists the key-value document as a single JSON object on
//! disk, the same way a browser profile keeps its local storage across
//! restarts. Every mutation rewrites the whole document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::{StorageError, StorageResult};
use crate::store::KeyValueStore;

/// Configuration for the file-backed store
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Location of the JSON document
    pub path: PathBuf,
}

impl FileStoreConfig {
    /// Create a new FileStoreConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STOREFRONT_STORAGE_PATH`: Path of the JSON document (default: ".storefront/local_storage.json")
    pub fn from_env() -> StorageResult<Self> {
        let path = std::env::var("STOREFRONT_STORAGE_PATH")
            .unwrap_or_else(|_| ".storefront/local_storage.json".to_string());

        Ok(FileStoreConfig {
            path: PathBuf::from(path),
        })
    }
}

/// Key-value store persisted to a JSON file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store, loading the document if it already exists
    ///
    /// A document that does not parse is moved aside to `*.json.corrupt` and
    /// the store starts empty. It is only an error if the move fails.
    pub fn open(config: &FileStoreConfig) -> StorageResult<Self> {
        let path = config.path.clone();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(source) => {
                    Self::set_aside(&path, source)?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No storage file at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(StorageError::Io { path, source }),
        };

        info!(
            "File store opened at {} with {} keys",
            path.display(),
            entries.len()
        );

        Ok(FileStore {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn set_aside(path: &Path, source: serde_json::Error) -> StorageResult<()> {
        let aside = path.with_extension("json.corrupt");
        error!(
            "Storage file {} is corrupt ({}), moving it to {}",
            path.display(),
            source,
            aside.display()
        );

        std::fs::rename(path, &aside).map_err(|e| {
            warn!("Failed to move corrupt storage file aside: {}", e);
            StorageError::Corrupt {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let document = serde_json::to_string_pretty(entries)?;

        // Write beside the target and rename so readers never see half a document
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, document).map_err(|source| StorageError::Io {
            path: staging.clone(),
            source,
        })?;
        std::fs::rename(&staging, &self.path).map_err(|source| {
            warn!("Failed to replace {}: {}", self.path.display(), source);
            StorageError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!("Setting key {} in {}", key, self.path.display());
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;

        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;

        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::LockPoisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }

        debug!("Removing key {} from {}", key, self.path.display());
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;

        Ok(())
    }
}
