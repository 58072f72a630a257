//! Storage backend implementations.
//!
//! This module provides different storage backends:
//! - InMemoryStore: Fast, ephemeral storage for tests and demos
//! - FileStore: single JSON file, loaded at open and written on flush

use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Error, Result};

/// File name used by [`FileStore`] inside its directory
pub const DATA_FILE_NAME: &str = "bizpulse-data.json";

// ═══════════════════════════════════════════════════════════════════════════════
// STORAGE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Key type for storage operations
pub type StorageKey = Vec<u8>;

/// Value type for storage operations
pub type StorageValue = Vec<u8>;

/// Trait for storage backends
pub trait StorageBackend: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &[u8]) -> Result<Option<StorageValue>>;

    /// Set a value for a key
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Delete a key
    fn delete(&self, key: &[u8]) -> Result<bool>;

    /// Check if a key exists
    fn exists(&self, key: &[u8]) -> Result<bool>;

    /// List all keys with a given prefix, in byte order
    fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<StorageKey>>;

    /// Flush any pending writes to persistent storage
    fn flush(&self) -> Result<()>;

    /// Clear all data
    fn clear(&self) -> Result<()>;
}

fn sorted_prefix_keys<'a>(keys: impl Iterator<Item = &'a Vec<u8>>, prefix: &[u8]) -> Vec<StorageKey> {
    let mut matched: Vec<StorageKey> = keys.filter(|k| k.starts_with(prefix)).cloned().collect();
    matched.sort();
    matched
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.data.read().map(|d| d.len()).unwrap_or(0)
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for InMemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<StorageValue>> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        Ok(data.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut data = self.data.write().map_err(|_| Error::Lock)?;
        data.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<bool> {
        let mut data = self.data.write().map_err(|_| Error::Lock)?;
        Ok(data.remove(key).is_some())
    }

    fn exists(&self, key: &[u8]) -> Result<bool> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        Ok(data.contains_key(key))
    }

    fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<StorageKey>> {
        let data = self.data.read().map_err(|_| Error::Lock)?;
        Ok(sorted_prefix_keys(data.keys(), prefix))
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut data = self.data.write().map_err(|_| Error::Lock)?;
        data.clear();
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE-BASED STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// File-based storage backend.
///
/// Keys must be UTF-8; values are hex encoded. Everything lives in memory
/// between flushes.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
    cache: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
    dirty: RwLock<bool>,
}

impl FileStore {
    /// Open (or create) a store in the given directory
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                Error::Storage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let store = Self {
            base_path,
            cache: RwLock::new(HashMap::new()),
            dirty: RwLock::new(false),
        };

        store.load_from_disk()?;

        Ok(store)
    }

    /// Path of the backing JSON file
    pub fn data_file_path(&self) -> PathBuf {
        self.base_path.join(DATA_FILE_NAME)
    }

    fn load_from_disk(&self) -> Result<()> {
        let path = self.data_file_path();

        if !path.exists() {
            return Ok(());
        }

        let file = File::open(&path)
            .map_err(|e| Error::Storage(format!("Failed to open data file: {}", e)))?;

        let data: BTreeMap<String, String> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Deserialization(format!("Failed to parse data file: {}", e)))?;

        let mut cache = self.cache.write().map_err(|_| Error::Lock)?;

        for (key, value_hex) in data {
            let value = hex::decode(&value_hex).map_err(|e| {
                Error::Deserialization(format!("Invalid value for key {}: {}", key, e))
            })?;
            cache.insert(key.into_bytes(), value);
        }

        Ok(())
    }

    fn save_to_disk(&self) -> Result<()> {
        let cache = self.cache.read().map_err(|_| Error::Lock)?;

        let mut data = BTreeMap::new();
        for (key, value) in cache.iter() {
            let key = String::from_utf8(key.clone())
                .map_err(|_| Error::Storage("File store keys must be UTF-8".into()))?;
            data.insert(key, hex::encode(value));
        }

        let file = File::create(self.data_file_path())
            .map_err(|e| Error::Storage(format!("Failed to open data file for writing: {}", e)))?;

        serde_json::to_writer_pretty(BufWriter::new(file), &data)
            .map_err(|e| Error::Serialization(format!("Failed to write data file: {}", e)))?;

        let mut dirty = self.dirty.write().map_err(|_| Error::Lock)?;
        *dirty = false;

        Ok(())
    }

    fn mark_dirty(&self) -> Result<()> {
        let mut dirty = self.dirty.write().map_err(|_| Error::Lock)?;
        *dirty = true;
        Ok(())
    }
}

impl StorageBackend for FileStore {
    fn get(&self, key: &[u8]) -> Result<Option<StorageValue>> {
        let cache = self.cache.read().map_err(|_| Error::Lock)?;
        Ok(cache.get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if std::str::from_utf8(key).is_err() {
            return Err(Error::Storage("File store keys must be UTF-8".into()));
        }
        {
            let mut cache = self.cache.write().map_err(|_| Error::Lock)?;
            cache.insert(key.to_vec(), value.to_vec());
        }
        self.mark_dirty()
    }

    fn delete(&self, key: &[u8]) -> Result<bool> {
        let existed = {
            let mut cache = self.cache.write().map_err(|_| Error::Lock)?;
            cache.remove(key).is_some()
        };
        if existed {
            self.mark_dirty()?;
        }
        Ok(existed)
    }

    fn exists(&self, key: &[u8]) -> Result<bool> {
        let cache = self.cache.read().map_err(|_| Error::Lock)?;
        Ok(cache.contains_key(key))
    }

    fn list_prefix(&self, prefix: &[u8]) -> Result<Vec<StorageKey>> {
        let cache = self.cache.read().map_err(|_| Error::Lock)?;
        Ok(sorted_prefix_keys(cache.keys(), prefix))
    }

    fn flush(&self) -> Result<()> {
        let dirty = *self.dirty.read().map_err(|_| Error::Lock)?;
        if dirty {
            self.save_to_disk()?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        {
            let mut cache = self.cache.write().map_err(|_| Error::Lock)?;
            cache.clear();
        }
        self.mark_dirty()
    }
}

impl Drop for FileStore {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TYPED STORE WRAPPER
// ═══════════════════════════════════════════════════════════════════════════════

/// Type-safe wrapper around a storage backend
pub struct TypedStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> TypedStore<B> {
    /// Create a new typed store
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Get a typed value
    pub fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.backend.get(key)? {
            Some(data) => {
                let value = bincode::deserialize(&data).map_err(|e| {
                    Error::Deserialization(format!("Failed to deserialize value: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a typed value
    pub fn set<T: Serialize>(&self, key: &[u8], value: &T) -> Result<()> {
        let data = bincode::serialize(value).map_err(|e| {
            Error::Serialization(format!("Failed to serialize value: {}", e))
        })?;
        self.backend.set(key, &data)
    }

    /// Load every value under a prefix, in key order
    pub fn values_with_prefix<T: DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>> {
        let mut values = Vec::new();
        for key in self.backend.list_prefix(prefix)? {
            if let Some(value) = self.get(&key)? {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// KEY PREFIXES
// ═══════════════════════════════════════════════════════════════════════════════

/// Key prefixes for different record types
pub mod prefixes {
    /// Financial summary prefix
    pub const FINANCIAL: &[u8] = b"fin:";
    /// Monthly series prefix
    pub const MONTH: &[u8] = b"mon:";
    /// Inventory item prefix
    pub const INVENTORY: &[u8] = b"inv:";
    /// Invoice prefix
    pub const INVOICE: &[u8] = b"bill:";
}

/// Create a key with a prefix
pub fn make_key(prefix: &[u8], key: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(prefix.len() + key.len());
    result.extend_from_slice(prefix);
    result.extend_from_slice(key);
    result
}
