//! `easy-defaults write` - store a typed value.
//!
//! Values arrive as text and are parsed according to `--type`:
//!
//! | Type     | Accepted input                          |
//! |----------|-----------------------------------------|
//! | `string` | anything                                |
//! | `int`    | 64-bit signed integer                   |
//! | `bool`   | `true`/`false`, `yes`/`no`, `1`/`0`     |
//! | `date`   | RFC 3339 timestamp or `now`             |
//! | `data`   | hex string                              |
//! | `dict`   | JSON object, stored as an encoded blob  |

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::codec;
use crate::store::DefaultsStore;
use crate::value::Value;

/// Type of a value given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ValueType {
    #[default]
    String,
    Int,
    Bool,
    Date,
    Data,
    Dict,
}

/// Parses command-line text into a value of the requested type.
///
/// # Errors
///
/// Returns an error if `raw` is not valid input for `ty`.
pub fn parse_value(ty: ValueType, raw: &str) -> Result<Value> {
    match ty {
        ValueType::String => Ok(Value::String(raw.to_string())),
        ValueType::Int => raw
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .with_context(|| format!("'{raw}' is not a valid integer")),
        ValueType::Bool => Value::from(raw)
            .coerce_boolean()
            .map(Value::Boolean)
            .with_context(|| format!("'{raw}' is not a valid boolean (use true/false, yes/no, 1/0)")),
        ValueType::Date => {
            if raw.trim().eq_ignore_ascii_case("now") {
                return Ok(Value::Timestamp(Utc::now()));
            }
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
                .with_context(|| format!("'{raw}' is not an RFC 3339 timestamp"))
        },
        ValueType::Data => hex::decode(raw.trim())
            .map(Value::Bytes)
            .with_context(|| format!("'{raw}' is not valid hex")),
        ValueType::Dict => {
            let mapping = codec::decode_mapping(raw.as_bytes())
                .with_context(|| "dict values must be a JSON object of strings, integers, booleans, or objects")?;
            let bytes = codec::encode_mapping(&mapping)?;
            Ok(Value::Bytes(bytes))
        },
    }
}

/// Execute the write command.
pub fn execute(store: &DefaultsStore, key: &str, raw: &str, ty: ValueType) -> Result<()> {
    let value = parse_value(ty, raw)?;
    store.try_set(key, value)?;
    store.try_flush()?;

    tracing::info!(namespace = %store.namespace(), key, "Wrote value");
    Ok(())
}
