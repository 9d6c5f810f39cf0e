//! Typed defaults store over any [`Backend`].
//!
//! The typed accessors never fail. Writes that cannot be encoded or
//! persisted are logged and dropped; reads of absent, mistyped, or
//! undecodable entries return the zero value for the requested type.
//! The `try_*` methods expose the same operations with errors intact.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;

use super::Namespace;
use super::backend::Backend;
use super::file::FileBackend;
use super::memory::MemoryBackend;
use super::redb::RedbBackend;
use crate::codec;
use crate::config::{BackendKind, Config};
use crate::value::{Mapping, Value};

/// String-keyed store of typed values scoped to one namespace.
///
/// # Thread Safety
///
/// `DefaultsStore` is `Clone`; clones share the backend. The store adds no
/// locking of its own and relies on the backend's internal synchronization.
///
/// # Example
///
/// ```ignore
/// use easy_defaults::store::{DefaultsStore, Namespace};
///
/// let store = DefaultsStore::memory(Namespace::new("com.test.EasyDefaultsTestApp")?);
/// store.set_string("my_string", "My test string");
/// store.set_boolean("my_bool", true);
///
/// assert_eq!(store.get_string("my_string"), "My test string");
/// assert_eq!(store.get_integer("never_written"), 0);
/// ```
#[derive(Clone)]
pub struct DefaultsStore {
    backend: Arc<dyn Backend>,
    namespace: Namespace,
}

impl DefaultsStore {
    /// Creates a store over `backend`.
    pub fn new<B: Backend>(namespace: Namespace, backend: B) -> Self {
        Self::from_shared(namespace, Arc::new(backend))
    }

    /// Creates a store over a backend that is already shared.
    pub fn from_shared(namespace: Namespace, backend: Arc<dyn Backend>) -> Self {
        Self { backend, namespace }
    }

    /// Creates a store over a fresh in-memory backend.
    pub fn memory(namespace: Namespace) -> Self {
        Self::new(namespace, MemoryBackend::new())
    }

    /// Creates a store over a redb database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn redb<P: AsRef<Path>>(path: P, namespace: Namespace) -> Result<Self> {
        Ok(Self::new(namespace, RedbBackend::open(path)?))
    }

    /// Creates a store over a directory of per-domain JSON files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn file<P: AsRef<Path>>(dir: P, namespace: Namespace) -> Result<Self> {
        Ok(Self::new(namespace, FileBackend::open(dir)?))
    }

    /// Creates the store described by a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is invalid, the default location
    /// cannot be resolved, or the backend fails to open.
    pub fn from_config(config: &Config) -> Result<Self> {
        let namespace = Namespace::new(config.store.namespace.clone())?;
        match config.store.backend {
            BackendKind::Memory => Ok(Self::memory(namespace)),
            BackendKind::Redb => {
                let path = config.store_path()?;
                Self::redb(&path, namespace)
                    .with_context(|| format!("Failed to open redb store at {}", path.display()))
            },
            BackendKind::File => {
                let dir = config.store_path()?;
                Self::file(&dir, namespace)
                    .with_context(|| format!("Failed to open file store at {}", dir.display()))
            },
        }
    }

    /// Returns a store for another namespace sharing this store's backend.
    pub fn with_namespace(&self, namespace: Namespace) -> Self {
        Self::from_shared(namespace, Arc::clone(&self.backend))
    }

    /// The namespace this store reads and writes.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    // =========================================================================
    // Fallible API
    // =========================================================================

    /// Stores `value` under `key`, replacing any previous value and type.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is empty, the value cannot be encoded,
    /// or the backend write fails.
    pub fn try_set(&self, key: &str, value: Value) -> Result<()> {
        if key.is_empty() {
            anyhow::bail!("key cannot be empty");
        }

        let bytes = codec::encode_entry(&value)?;
        self.backend
            .write(&self.namespace, key, bytes)
            .with_context(|| format!("Failed to write '{key}' in '{}'", self.namespace))?;

        tracing::debug!(namespace = %self.namespace, key, kind = value.type_name(), "Stored value");
        Ok(())
    }

    /// Reads the value under `key`.
    ///
    /// An entry whose bytes cannot be decoded reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn try_get(&self, key: &str) -> Result<Option<Value>> {
        if key.is_empty() {
            return Ok(None);
        }

        let Some(bytes) = self
            .backend
            .read(&self.namespace, key)
            .with_context(|| format!("Failed to read '{key}' in '{}'", self.namespace))?
        else {
            return Ok(None);
        };

        match codec::decode_entry(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "Undecodable entry, treating as absent");
                Ok(None)
            },
        }
    }

    /// Removes `key`. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend remove fails.
    pub fn try_remove(&self, key: &str) -> Result<bool> {
        self.backend
            .remove(&self.namespace, key)
            .with_context(|| format!("Failed to remove '{key}' in '{}'", self.namespace))
    }

    /// Lists every key in the namespace, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend listing fails.
    pub fn try_keys(&self) -> Result<Vec<String>> {
        let mut keys = self
            .backend
            .keys(&self.namespace)
            .with_context(|| format!("Failed to list keys in '{}'", self.namespace))?;
        keys.sort();
        Ok(keys)
    }

    /// Erases every entry of the namespace and flushes the medium.
    ///
    /// # Errors
    ///
    /// Returns an error if erasing or flushing fails.
    pub fn try_clear(&self) -> Result<()> {
        self.backend
            .erase_all(&self.namespace)
            .with_context(|| format!("Failed to erase '{}'", self.namespace))?;
        self.try_flush()?;

        tracing::debug!(namespace = %self.namespace, "Cleared domain");
        Ok(())
    }

    /// Flushes buffered writes to the medium.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend flush fails.
    pub fn try_flush(&self) -> Result<()> {
        self.backend
            .flush(&self.namespace)
            .with_context(|| format!("Failed to flush '{}'", self.namespace))
    }

    // =========================================================================
    // Best-effort API
    // =========================================================================

    /// Stores any value, logging and dropping the write on failure.
    pub fn set(&self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        if let Err(e) = self.try_set(key, value) {
            tracing::warn!(namespace = %self.namespace, key, error = %e, "Dropped write");
        }
    }

    /// Stores a string.
    pub fn set_string(&self, key: &str, value: impl Into<String>) {
        self.set(key, Value::String(value.into()));
    }

    /// Stores an integer.
    pub fn set_integer(&self, key: &str, value: i64) {
        self.set(key, Value::Integer(value));
    }

    /// Stores a boolean.
    pub fn set_boolean(&self, key: &str, value: bool) {
        self.set(key, Value::Boolean(value));
    }

    /// Stores a timestamp.
    pub fn set_timestamp(&self, key: &str, value: DateTime<Utc>) {
        self.set(key, Value::Timestamp(value));
    }

    /// Stores an opaque byte blob.
    pub fn set_bytes(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.set(key, Value::Bytes(value.into()));
    }

    /// Encodes `mapping` and stores the result as bytes.
    ///
    /// If the mapping cannot be encoded the write is skipped and logged.
    pub fn set_mapping(&self, key: &str, mapping: &Mapping) {
        match codec::encode_mapping(mapping) {
            Ok(bytes) => self.set_bytes(key, bytes),
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "Skipped mapping write");
            },
        }
    }

    /// Reads any value, or `None` if absent or unreadable.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(namespace = %self.namespace, key, error = %e, "Read failed");
                None
            },
        }
    }

    /// Reads a string, defaulting to `""`.
    pub fn get_string(&self, key: &str) -> String {
        self.get(key)
            .and_then(|v| v.coerce_string())
            .unwrap_or_default()
    }

    /// Reads an integer, defaulting to `0`.
    pub fn get_integer(&self, key: &str) -> i64 {
        self.get(key)
            .and_then(|v| v.coerce_integer())
            .unwrap_or_default()
    }

    /// Reads a boolean, defaulting to `false`.
    pub fn get_boolean(&self, key: &str) -> bool {
        self.get(key)
            .and_then(|v| v.coerce_boolean())
            .unwrap_or_default()
    }

    /// Reads a timestamp.
    pub fn get_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.get(key).and_then(|v| v.coerce_timestamp())
    }

    /// Reads a byte blob.
    pub fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        self.get(key).and_then(|v| v.coerce_bytes())
    }

    /// Reads and decodes a mapping.
    ///
    /// Returns `None` if nothing is stored, the value is neither bytes nor a
    /// mapping, or the bytes fail to decode.
    pub fn get_mapping(&self, key: &str) -> Option<Mapping> {
        match self.get(key)? {
            Value::Mapping(mapping) => Some(mapping),
            Value::Bytes(bytes) => match codec::decode_mapping(&bytes) {
                Ok(mapping) => Some(mapping),
                Err(e) => {
                    tracing::debug!(namespace = %self.namespace, key, error = %e, "Stored bytes are not a mapping");
                    None
                },
            },
            _ => None,
        }
    }

    /// Removes `key`, returning whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.try_remove(key).unwrap_or_else(|e| {
            tracing::warn!(namespace = %self.namespace, key, error = %e, "Remove failed");
            false
        })
    }

    /// Returns true if a readable value is stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Lists every key, sorted. Empty on failure.
    pub fn keys(&self) -> Vec<String> {
        self.try_keys().unwrap_or_else(|e| {
            tracing::warn!(namespace = %self.namespace, error = %e, "Key listing failed");
            Vec::new()
        })
    }

    /// Every readable entry of the namespace.
    pub fn snapshot(&self) -> Mapping {
        self.keys()
            .into_iter()
            .filter_map(|key| self.get(&key).map(|value| (key, value)))
            .collect()
    }

    /// Erases every entry of the namespace and flushes the medium.
    pub fn clear(&self) {
        if let Err(e) = self.try_clear() {
            tracing::warn!(namespace = %self.namespace, error = %e, "Clear failed");
        }
    }

    /// Flushes buffered writes, logging failures.
    pub fn flush(&self) {
        if let Err(e) = self.try_flush() {
            tracing::warn!(namespace = %self.namespace, error = %e, "Flush failed");
        }
    }
}

impl std::fmt::Debug for DefaultsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultsStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}
