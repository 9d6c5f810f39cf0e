//! File-backed defaults backend.
//!
//! Stores each namespace as one JSON document, `<dir>/<namespace>.json`,
//! the way a per-domain preferences file works. Domains are loaded lazily
//! into memory; writes only touch the cache and mark the domain dirty until
//! [`Backend::flush`] (or drop) rewrites the file atomically.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::Namespace;
use super::backend::Backend;

/// On-disk format version.
const FILE_FORMAT_VERSION: u32 = 1;

/// Serialized form of one domain file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DomainFile {
    version: u32,
    /// Entry bytes, hex encoded.
    entries: BTreeMap<String, String>,
}

/// Cached contents of one domain.
#[derive(Debug, Default)]
struct Domain {
    entries: BTreeMap<String, Vec<u8>>,
    dirty: bool,
}

/// File-backed defaults backend with buffered writes.
///
/// A corrupted domain file is treated as an empty domain (logged at `warn`)
/// and replaced on the next flush.
pub struct FileBackend {
    dir: PathBuf,
    domains: RwLock<HashMap<String, Domain>>,
}

impl FileBackend {
    /// Opens a backend rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create domains directory: {}", dir.display()))?;

        Ok(Self {
            dir,
            domains: RwLock::new(HashMap::new()),
        })
    }

    /// Path of the file holding `namespace`.
    pub fn domain_path(&self, namespace: &Namespace) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }

    fn load_domain(&self, namespace: &Namespace) -> Result<Domain> {
        let path = self.domain_path(namespace);
        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Domain::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read domain file: {}", path.display()));
            },
        };

        let file: DomainFile = match serde_json::from_slice(&content) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Corrupted domain file, starting empty");
                return Ok(Domain::default());
            },
        };

        let mut entries = BTreeMap::new();
        for (key, encoded) in file.entries {
            match hex::decode(&encoded) {
                Ok(bytes) => {
                    entries.insert(key, bytes);
                },
                Err(e) => {
                    tracing::warn!(path = %path.display(), key = %key, error = %e, "Skipping undecodable entry");
                },
            }
        }

        Ok(Domain {
            entries,
            dirty: false,
        })
    }

    /// Runs `f` against the cached domain, loading it first if needed.
    fn with_domain<R>(&self, namespace: &Namespace, f: impl FnOnce(&mut Domain) -> R) -> Result<R> {
        let mut domains = self.domains.write();
        if !domains.contains_key(namespace.as_str()) {
            let domain = self.load_domain(namespace)?;
            domains.insert(namespace.as_str().to_string(), domain);
        }

        let domain = domains
            .get_mut(namespace.as_str())
            .context("Domain missing from cache after load")?;
        Ok(f(domain))
    }

    fn write_domain(&self, name: &str, domain: &Domain) -> Result<()> {
        let file = DomainFile {
            version: FILE_FORMAT_VERSION,
            entries: domain
                .entries
                .iter()
                .map(|(key, bytes)| (key.clone(), hex::encode(bytes)))
                .collect(),
        };
        let json = serde_json::to_vec_pretty(&file).context("Failed to serialize domain file")?;

        let path = self.dir.join(format!("{name}.json"));
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("Failed to create temp file in {}", self.dir.display()))?;
        tmp.write_all(&json)
            .context("Failed to write domain temp file")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to sync domain temp file")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to replace domain file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), entries = domain.entries.len(), "Flushed domain file");
        Ok(())
    }
}

impl Backend for FileBackend {
    fn read(&self, namespace: &Namespace, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(domain) = self.domains.read().get(namespace.as_str()) {
            return Ok(domain.entries.get(key).cloned());
        }
        self.with_domain(namespace, |domain| domain.entries.get(key).cloned())
    }

    fn write(&self, namespace: &Namespace, key: &str, value: Vec<u8>) -> Result<()> {
        self.with_domain(namespace, |domain| {
            domain.entries.insert(key.to_string(), value);
            domain.dirty = true;
        })
    }

    fn remove(&self, namespace: &Namespace, key: &str) -> Result<bool> {
        self.with_domain(namespace, |domain| {
            let removed = domain.entries.remove(key).is_some();
            domain.dirty |= removed;
            removed
        })
    }

    fn keys(&self, namespace: &Namespace) -> Result<Vec<String>> {
        self.with_domain(namespace, |domain| domain.entries.keys().cloned().collect())
    }

    fn erase_all(&self, namespace: &Namespace) -> Result<()> {
        let mut domains = self.domains.write();
        domains.insert(namespace.as_str().to_string(), Domain::default());

        let path = self.domain_path(namespace);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to remove domain file: {}", path.display()))
            },
        }
    }

    fn flush(&self, namespace: &Namespace) -> Result<()> {
        let mut domains = self.domains.write();
        let Some(domain) = domains.get_mut(namespace.as_str()) else {
            return Ok(());
        };

        if domain.dirty {
            self.write_domain(namespace.as_str(), domain)?;
            domain.dirty = false;
        }
        Ok(())
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        let domains = std::mem::take(self.domains.get_mut());
        for (name, domain) in domains.iter().filter(|(_, d)| d.dirty) {
            if let Err(e) = self.write_domain(name, domain) {
                tracing::warn!(namespace = %name, error = %e, "Failed to flush domain on drop");
            }
        }
    }
}
