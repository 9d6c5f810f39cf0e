//! Redb-backed defaults backend.
//!
//! Persistent storage with ACID guarantees. Each namespace is its own redb
//! table inside a single database file, so erasing a domain is a single
//! `delete_table` in one transaction.

use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, TableError};
use std::path::Path;
use std::sync::Arc;

use super::Namespace;
use super::backend::Backend;

/// Table definition for one namespace.
fn domain_table(namespace: &Namespace) -> TableDefinition<'_, &'static str, &'static [u8]> {
    TableDefinition::new(namespace.as_str())
}

/// Redb-backed defaults backend.
///
/// Every write commits its own transaction, so data is durable as soon as
/// the call returns and [`Backend::flush`] has nothing left to do.
///
/// # Thread Safety
///
/// `RedbBackend` is `Clone` and can be shared across threads. The underlying
/// database handles concurrent access safely.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, lock held, etc.)
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create defaults directory: {}", parent.display())
            })?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open defaults database: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Opened redb defaults database");

        Ok(Self { db: Arc::new(db) })
    }
}

impl Backend for RedbBackend {
    fn read(&self, namespace: &Namespace, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = match read_txn.open_table(domain_table(namespace)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open domain '{namespace}'"));
            },
        };

        let result = table
            .get(key)
            .with_context(|| format!("Failed to read key '{key}'"))?;

        Ok(result.map(|guard| guard.value().to_vec()))
    }

    fn write(&self, namespace: &Namespace, key: &str, value: Vec<u8>) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        {
            let mut table = write_txn
                .open_table(domain_table(namespace))
                .with_context(|| format!("Failed to open domain '{namespace}'"))?;

            table
                .insert(key, value.as_slice())
                .with_context(|| format!("Failed to insert key '{key}'"))?;
        }

        write_txn
            .commit()
            .context("Failed to commit write transaction")?;

        Ok(())
    }

    fn remove(&self, namespace: &Namespace, key: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let removed = {
            let mut table = write_txn
                .open_table(domain_table(namespace))
                .with_context(|| format!("Failed to open domain '{namespace}'"))?;

            table
                .remove(key)
                .with_context(|| format!("Failed to remove key '{key}'"))?
                .is_some()
        };

        write_txn
            .commit()
            .context("Failed to commit remove transaction")?;

        Ok(removed)
    }

    fn keys(&self, namespace: &Namespace) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = match read_txn.open_table(domain_table(namespace)) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open domain '{namespace}'"));
            },
        };

        let mut keys = Vec::new();
        for item in table.iter().context("Failed to iterate domain table")? {
            let (key, _) = item.context("Failed to read defaults entry")?;
            keys.push(key.value().to_string());
        }

        Ok(keys)
    }

    fn erase_all(&self, namespace: &Namespace) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let existed = write_txn
            .delete_table(domain_table(namespace))
            .with_context(|| format!("Failed to delete domain '{namespace}'"))?;

        write_txn
            .commit()
            .context("Failed to commit erase transaction")?;

        tracing::debug!(namespace = %namespace, existed, "Erased redb domain");
        Ok(())
    }
}
