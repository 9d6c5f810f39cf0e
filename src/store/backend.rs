//! Backend trait for the persistence medium behind a defaults store.
//!
//! A backend is a namespaced byte store: every operation names the domain
//! it acts on, so one backend instance can host many independent stores.

use anyhow::Result;

use super::Namespace;

/// Persistence medium for defaults entries.
///
/// All backends must be thread-safe (`Send + Sync`). Implementations handle
/// their own concurrency; the store adds no locking on top.
///
/// # Example
///
/// ```ignore
/// use easy_defaults::store::{Backend, MemoryBackend, Namespace};
///
/// let backend = MemoryBackend::new();
/// let ns = Namespace::new("com.example.app")?;
/// backend.write(&ns, "key", b"value".to_vec())?;
/// assert_eq!(backend.read(&ns, "key")?, Some(b"value".to_vec()));
/// ```
pub trait Backend: Send + Sync + 'static {
    /// Reads the raw bytes stored under `key`.
    ///
    /// Returns `Ok(None)` if the key or the whole namespace doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn read(&self, namespace: &Namespace, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores raw bytes under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn write(&self, namespace: &Namespace, key: &str, value: Vec<u8>) -> Result<()>;

    /// Removes a single key.
    ///
    /// Returns `Ok(true)` if the key existed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn remove(&self, namespace: &Namespace, key: &str) -> Result<bool>;

    /// Lists every key in the namespace, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn keys(&self, namespace: &Namespace) -> Result<Vec<String>>;

    /// Erases every entry of the namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn erase_all(&self, namespace: &Namespace) -> Result<()>;

    /// Pushes buffered writes for the namespace to durable storage.
    ///
    /// Backends that commit every write immediately keep the default no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage operation fails.
    fn flush(&self, namespace: &Namespace) -> Result<()> {
        let _ = namespace;
        Ok(())
    }
}
