//! Namespace (domain) identifiers.

use anyhow::Result;
use std::fmt;
use std::str::FromStr;

/// Longest accepted namespace, in bytes.
const MAX_NAMESPACE_LEN: usize = 255;

/// Identifier scoping a store's entries, e.g. `com.test.EasyDefaultsTestApp`.
///
/// Namespaces double as file and table names, so they must be non-empty,
/// at most 255 bytes, and free of path separators and control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Validates and wraps a namespace name.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first rule the name breaks.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// The namespace as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("namespace cannot be empty");
    }
    if name.len() > MAX_NAMESPACE_LEN {
        anyhow::bail!("namespace is longer than {MAX_NAMESPACE_LEN} bytes");
    }
    if name == "." || name == ".." {
        anyhow::bail!("namespace cannot be '{name}'");
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '/' | '\\') || c.is_control())
    {
        anyhow::bail!("namespace '{}' contains invalid character {c:?}", name.escape_debug());
    }
    Ok(())
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Namespace {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
