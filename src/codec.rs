//! Byte encodings for stored entries and encoded mappings.
//!
//! Two encodings live here:
//!
//! - **Entries**: every value written to a backend is the JSON form of
//!   [`Value`], so the variant survives the round trip through the medium.
//! - **Mappings**: `set_mapping` stores the tagged JSON form of a [`Mapping`]
//!   as an opaque byte blob. Decoding also accepts any plain JSON object,
//!   which is what generic JSON encoders produce.
//!
//! [`decode_bytes_to_mapping`] is the best-effort entry point: it never
//! fails and degrades to an empty mapping on malformed input.

use crate::value::{Mapping, Value};

/// Maximum mapping nesting accepted on encode and decode.
pub const MAX_NESTING_DEPTH: usize = 32;

/// Encoding and decoding failures.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The value cannot be represented in the byte encoding.
    #[error("encode error: {0}")]
    Encode(String),

    /// The bytes do not match the expected structure.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Serializes a single stored entry.
pub fn encode_entry(value: &Value) -> Result<Vec<u8>> {
    check_depth(value.depth())?;
    serde_json::to_vec(value).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Deserializes a single stored entry.
pub fn decode_entry(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encodes a mapping into the opaque byte form written by `set_mapping`.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if the mapping nests deeper than
/// [`MAX_NESTING_DEPTH`].
pub fn encode_mapping(mapping: &Mapping) -> Result<Vec<u8>> {
    let depth = 1 + mapping.values().map(Value::depth).max().unwrap_or(0);
    check_depth(depth)?;
    serde_json::to_vec(mapping).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Strictly decodes a mapping blob.
///
/// Tries the tagged encoding first, then a plain JSON object.
///
/// The two forms overlap: a plain object whose every value is itself an
/// object of the shape `{"type": <variant>, "value": ...}` is read as the
/// tagged encoding. `{"a":{"type":"string","value":"x"}}` therefore decodes
/// to `{"a": String("x")}`, not to a nested mapping. Blobs written by
/// [`encode_mapping`] always take the tagged path.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if the bytes are neither encoding, or if
/// a plain JSON object contains values with no [`Value`] counterpart
/// (null, arrays, fractional numbers).
pub fn decode_mapping(bytes: &[u8]) -> Result<Mapping> {
    if let Ok(mapping) = serde_json::from_slice::<Mapping>(bytes) {
        let depth = 1 + mapping.values().map(Value::depth).max().unwrap_or(0);
        if depth > MAX_NESTING_DEPTH {
            return Err(CodecError::Decode(format!(
                "mapping nests {depth} levels deep, limit is {MAX_NESTING_DEPTH}"
            )));
        }
        return Ok(mapping);
    }

    let json: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;

    match json {
        serde_json::Value::Object(object) => object_to_mapping(object, 1),
        other => Err(CodecError::Decode(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

/// Decodes a mapping blob, returning an empty mapping on any failure.
pub fn decode_bytes_to_mapping(bytes: &[u8]) -> Mapping {
    match decode_mapping(bytes) {
        Ok(mapping) => mapping,
        Err(e) => {
            tracing::debug!(error = %e, len = bytes.len(), "Mapping decode failed, using empty mapping");
            Mapping::new()
        },
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::Encode(format!(
            "mapping nests {depth} levels deep, limit is {MAX_NESTING_DEPTH}"
        )));
    }
    Ok(())
}

fn object_to_mapping(
    object: serde_json::Map<String, serde_json::Value>,
    depth: usize,
) -> Result<Mapping> {
    if depth > MAX_NESTING_DEPTH {
        return Err(CodecError::Decode(format!(
            "mapping nests more than {MAX_NESTING_DEPTH} levels deep"
        )));
    }

    object
        .into_iter()
        .map(|(key, json)| {
            let value = json_to_value(&key, json, depth)?;
            Ok((key, value))
        })
        .collect()
}

fn json_to_value(key: &str, json: serde_json::Value, depth: usize) -> Result<Value> {
    match json {
        serde_json::Value::String(s) => Ok(Value::String(s)),
        serde_json::Value::Bool(b) => Ok(Value::Boolean(b)),
        serde_json::Value::Number(n) => n.as_i64().map(Value::Integer).ok_or_else(|| {
            CodecError::Decode(format!("value for '{key}' is not a 64-bit integer: {n}"))
        }),
        serde_json::Value::Object(object) => {
            object_to_mapping(object, depth + 1).map(Value::Mapping)
        },
        other => Err(CodecError::Decode(format!(
            "value for '{key}' has unsupported type {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
