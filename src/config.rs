//! Configuration for the easy-defaults CLI.
//!
//! Settings are read from `config.toml` in the home directory (see
//! [`crate::paths`]). Every field has a default, so a missing file is the
//! same as an empty one.
//!
//! ```toml
//! [store]
//! namespace = "com.test.EasyDefaultsTestApp"
//! backend = "redb"   # redb | file | memory
//! path = "/custom/location"
//!
//! [log]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::paths;
use crate::store::Namespace;

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "com.test.EasyDefaultsTestApp";

/// Log level used when neither the config nor `RUST_LOG` sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Store selection.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default)]
    pub backend: BackendKind,
    /// Database file (redb) or domains directory (file). Defaults under the
    /// home directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            backend: BackendKind::default(),
            path: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Persistence medium behind the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Single redb database file.
    #[default]
    Redb,
    /// One JSON document per namespace.
    File,
    /// Process memory only.
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BackendKind::Redb => "redb",
            BackendKind::File => "file",
            BackendKind::Memory => "memory",
        })
    }
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redb" => Ok(BackendKind::Redb),
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            other => anyhow::bail!("unknown backend '{other}' (expected redb, file, or memory)"),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be resolved or the file
    /// exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = paths::get_config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Location of the backend's data.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is configured and the home directory
    /// cannot be resolved.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }
        match self.store.backend {
            BackendKind::File => paths::get_domains_dir(),
            BackendKind::Redb | BackendKind::Memory => paths::get_store_path(),
        }
    }

    /// Validate configuration.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error listing every problem if:
    /// - The namespace is empty or not a valid identifier
    /// - The log level is unknown
    /// - The store path is empty
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if let Err(e) = Namespace::new(self.store.namespace.clone()) {
            errors.push(format!("store.namespace: {e}"));
        }

        let level = self.log.level.to_ascii_lowercase();
        if !VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!(
                "Invalid log level '{}'. Valid levels: {}",
                self.log.level,
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if let Some(path) = &self.store.path
            && path.as_os_str().is_empty()
        {
            errors.push("store.path cannot be empty (omit it to use the default)".to_string());
        }

        if self.store.backend == BackendKind::Memory {
            warnings.push(
                "store.backend is 'memory': nothing written survives this process".to_string(),
            );
        }

        if self.store.backend == BackendKind::Memory && self.store.path.is_some() {
            warnings.push("store.path is ignored by the memory backend".to_string());
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}
