//! In-memory defaults backend.
//!
//! Non-persistent storage using DashMap, one inner map per namespace.
//! Used for tests and for embedding where nothing must touch disk.

use anyhow::Result;
use dashmap::DashMap;
use std::collections::HashMap;

use super::Namespace;
use super::backend::Backend;

/// In-memory backend using DashMap.
///
/// Each namespace owns one `HashMap` behind a DashMap shard lock, so
/// `erase_all` drops a whole domain in one step. All data is lost when
/// the backend is dropped.
///
/// # Example
///
/// ```ignore
/// use easy_defaults::store::{DefaultsStore, MemoryBackend, Namespace};
///
/// let store = DefaultsStore::new(Namespace::new("com.example.app")?, MemoryBackend::new());
/// store.set_integer("launches", 3);
/// ```
#[derive(Default)]
pub struct MemoryBackend {
    domains: DashMap<String, HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in one namespace.
    pub fn len(&self, namespace: &Namespace) -> usize {
        self.domains
            .get(namespace.as_str())
            .map_or(0, |domain| domain.len())
    }

    /// Returns true if the namespace holds no entries.
    pub fn is_empty(&self, namespace: &Namespace) -> bool {
        self.len(namespace) == 0
    }
}

impl Backend for MemoryBackend {
    fn read(&self, namespace: &Namespace, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .domains
            .get(namespace.as_str())
            .and_then(|domain| domain.get(key).cloned()))
    }

    fn write(&self, namespace: &Namespace, key: &str, value: Vec<u8>) -> Result<()> {
        self.domains
            .entry(namespace.as_str().to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, namespace: &Namespace, key: &str) -> Result<bool> {
        Ok(self
            .domains
            .get_mut(namespace.as_str())
            .is_some_and(|mut domain| domain.remove(key).is_some()))
    }

    fn keys(&self, namespace: &Namespace) -> Result<Vec<String>> {
        Ok(self
            .domains
            .get(namespace.as_str())
            .map(|domain| domain.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn erase_all(&self, namespace: &Namespace) -> Result<()> {
        self.domains.remove(namespace.as_str());
        Ok(())
    }
}
