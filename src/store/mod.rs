//! Defaults store with pluggable persistence backends.
//!
//! A [`DefaultsStore`] is constructed once with an explicit [`Namespace`]
//! and handed to every call site. Supported backends:
//!
//! - **RedbBackend**: Persistent storage with ACID guarantees (default for the CLI)
//! - **FileBackend**: One JSON document per namespace, written on flush
//! - **MemoryBackend**: Non-persistent storage for tests and embedding
//!
//! # Example
//!
//! ```ignore
//! use easy_defaults::store::{DefaultsStore, Namespace};
//!
//! let ns = Namespace::new("com.test.EasyDefaultsTestApp")?;
//!
//! // In-memory (testing/embedding)
//! let store = DefaultsStore::memory(ns.clone());
//!
//! // Persistent
//! let store = DefaultsStore::redb("~/.easy-defaults/defaults.redb", ns)?;
//! store.set_integer("counter", 1);
//! ```
//!
//! # Custom Backends
//!
//! Implement the [`Backend`] trait to use other storage:
//!
//! ```ignore
//! struct SqliteBackend { /* ... */ }
//! impl Backend for SqliteBackend { /* ... */ }
//!
//! let store = DefaultsStore::new(ns, SqliteBackend::new());
//! ```

mod backend;
mod defaults;
mod file;
mod memory;
mod namespace;
mod redb;

#[cfg(test)]
mod tests;

pub use backend::Backend;
pub use defaults::DefaultsStore;
pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use namespace::Namespace;
pub use self::redb::RedbBackend;
