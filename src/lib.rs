//! # easy-defaults
//!
//! A persistent, namespaced key-value store with typed accessors, modeled on
//! platform "user defaults" stores.
//!
//! Entries are string-keyed [`Value`]s (string, integer, boolean, timestamp,
//! bytes, or a nested mapping). Typed getters never fail: absent or
//! unreadable entries yield the zero value of the requested type, and
//! mappings stored as encoded bytes are decoded on a best-effort basis.
//!
//! ```ignore
//! use easy_defaults::{DefaultsStore, Namespace};
//!
//! let store = DefaultsStore::redb("defaults.redb", Namespace::new("com.example.app")?)?;
//! store.set_string("my_string", "My test string");
//! store.set_boolean("my_bool", true);
//!
//! assert_eq!(store.get_string("my_string"), "My test string");
//! assert!(!store.get_boolean("unset"));
//!
//! store.clear();
//! ```
//!
//! ## Modules
//!
//! - [`store`] - [`DefaultsStore`] and its persistence backends
//! - [`value`] - the [`Value`] variant type
//! - [`codec`] - entry and mapping encodings, [`decode_bytes_to_mapping`]
//! - [`config`] - TOML configuration for the CLI
//! - [`paths`] - default file locations
//! - [`commands`] - CLI command handlers

#![deny(unsafe_code)]

pub mod codec;
pub mod commands;
pub mod config;
pub mod paths;
pub mod store;
pub mod value;

pub use codec::{CodecError, decode_bytes_to_mapping};
pub use config::Config;
pub use store::{Backend, DefaultsStore, FileBackend, MemoryBackend, Namespace, RedbBackend};
pub use value::{Mapping, Value};
