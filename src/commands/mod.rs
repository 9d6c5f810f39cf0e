//! CLI command implementations for easy-defaults.
//!
//! Each submodule implements one group of commands:
//!
//! - [`read`] - Print one value or a whole domain
//! - [`write`] - Store a typed value parsed from the command line
//! - [`manage`] - Delete keys, list keys, clear a domain
//! - [`seed`] - Fill a domain with sample values of every type

pub mod manage;
pub mod read;
pub mod seed;
pub mod write;
