//! `easy-defaults read` - print one value or every entry of a domain.
//!
//! Byte values that hold an encoded mapping are shown decoded next to their
//! raw form, using the same best-effort decoder as `get_mapping`.

use anyhow::Result;

use crate::codec;
use crate::store::DefaultsStore;
use crate::value::Value;

/// Renders one entry as a single line.
pub fn render_entry(key: &str, value: &Value) -> String {
    let mut line = format!("{key} ({}) = {value}", value.type_name());

    if let Value::Bytes(bytes) = value {
        let decoded = codec::decode_bytes_to_mapping(bytes);
        if !decoded.is_empty() {
            line.push_str(&format!(" -> {}", Value::Mapping(decoded)));
        }
    }

    line
}

/// Renders every entry of the store, one per line, sorted by key.
pub fn render_domain(store: &DefaultsStore) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for key in store.try_keys()? {
        if let Some(value) = store.try_get(&key)? {
            lines.push(render_entry(&key, &value));
        }
    }
    Ok(lines)
}

/// Execute the read command.
pub fn execute(store: &DefaultsStore, key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => {
            let value = store.try_get(key)?.ok_or_else(|| {
                anyhow::anyhow!("Key '{key}' not found in domain '{}'", store.namespace())
            })?;
            println!("{}", render_entry(key, &value));
        },
        None => {
            let lines = render_domain(store)?;
            if lines.is_empty() {
                println!("Domain '{}' is empty", store.namespace());
            }
            for line in lines {
                println!("{line}");
            }
        },
    }
    Ok(())
}
