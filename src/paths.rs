//! Path utilities for easy-defaults.
//!
//! # Base Directory
//! - [`get_home_dir`] - `~/.easy-defaults/` (base directory for all data)
//!
//! # Files
//! - [`get_config_path`] - `~/.easy-defaults/config.toml` (CLI settings)
//! - [`get_store_path`] - `~/.easy-defaults/defaults.redb` (redb backend database)
//! - [`get_domains_dir`] - `~/.easy-defaults/domains/` (file backend documents)

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable overriding the base directory.
pub const HOME_ENV: &str = "EASY_DEFAULTS_HOME";

/// Get the base directory.
///
/// Resolution order:
/// 1. `EASY_DEFAULTS_HOME` environment variable (if set and non-empty)
/// 2. `~/.easy-defaults/` (default)
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var(HOME_ENV)
        && !home.is_empty()
    {
        return Ok(PathBuf::from(home));
    }

    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(".easy-defaults"))
}

/// Get the config file path: `~/.easy-defaults/config.toml`
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("config.toml"))
}

/// Get the redb database path: `~/.easy-defaults/defaults.redb`
pub fn get_store_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("defaults.redb"))
}

/// Get the file backend directory: `~/.easy-defaults/domains/`
pub fn get_domains_dir() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("domains"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // EASY_DEFAULTS_HOME itself is not exercised here: mutating the process
    // environment needs unsafe code in edition 2024.

    #[test]
    fn test_derived_paths_structure() {
        let base = get_home_dir().unwrap();

        assert!(get_config_path().unwrap().starts_with(&base));
        assert!(get_store_path().unwrap().starts_with(&base));
        assert!(get_domains_dir().unwrap().starts_with(&base));
    }

    #[test]
    fn test_default_base_dir() {
        if std::env::var(HOME_ENV).is_err() {
            let home = dirs::home_dir().expect("home directory should exist");
            assert_eq!(get_home_dir().unwrap(), home.join(".easy-defaults"));
        }
    }

    #[test]
    fn test_path_extensions() {
        let config = get_config_path().unwrap();
        assert_eq!(config.extension().and_then(|e| e.to_str()), Some("toml"));

        let store = get_store_path().unwrap();
        assert_eq!(store.extension().and_then(|e| e.to_str()), Some("redb"));
    }
}
