//! Value types stored in a defaults domain.
//!
//! Every entry in a [`DefaultsStore`](crate::store::DefaultsStore) holds one
//! [`Value`]. The set of variants is closed:
//!
//! - [`Value::String`] - UTF-8 text
//! - [`Value::Integer`] - 64-bit signed integer
//! - [`Value::Boolean`] - true or false
//! - [`Value::Timestamp`] - UTC instant with nanosecond precision
//! - [`Value::Bytes`] - opaque binary blob
//! - [`Value::Mapping`] - nested string-keyed mapping of values
//!
//! Typed reads go through the `coerce_*` helpers, which implement the
//! zero-value and cross-type conversion rules of the typed getters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// String-keyed mapping of values, ordered by key.
pub type Mapping = BTreeMap<String, Value>;

/// A dynamically-typed defaults value.
///
/// Serialized adjacently tagged, e.g. `{"type":"integer","value":42}`.
/// Bytes travel as a lowercase hex string and timestamps as RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// UTF-8 text.
    String(String),
    /// 64-bit signed integer.
    Integer(i64),
    /// Boolean flag.
    Boolean(bool),
    /// UTC timestamp.
    Timestamp(DateTime<Utc>),
    /// Opaque binary data.
    Bytes(#[serde(with = "hex_bytes")] Vec<u8>),
    /// Nested mapping.
    Mapping(Mapping),
}

impl Value {
    /// Returns the type name used in log messages and CLI output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Bytes(_) => "bytes",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Depth of mapping nesting. Scalars are depth 0, a flat mapping is 1.
    pub fn depth(&self) -> usize {
        match self {
            Value::Mapping(map) => 1 + map.values().map(Value::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    /// String view of the value.
    ///
    /// Integers and booleans are rendered; everything else has no string form.
    pub fn coerce_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Integer view of the value.
    pub fn coerce_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Boolean(b) => Some(i64::from(*b)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean view of the value.
    pub fn coerce_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Integer(i) => Some(*i != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Timestamp view of the value. Strings must be RFC 3339.
    pub fn coerce_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .ok()
                .map(|ts| ts.with_timezone(&Utc)),
            _ => None,
        }
    }

    /// Byte view of the value. Only stored bytes qualify.
    pub fn coerce_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Value::Bytes(b) => Some(b.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Value::Bytes(b) => write!(f, "<{}>", hex::encode(b)),
            Value::Mapping(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("}")
            },
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

/// Serde adapter storing byte vectors as hex strings.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::from("a").type_name(), "string");
        assert_eq!(Value::from(1).type_name(), "integer");
        assert_eq!(Value::from(true).type_name(), "boolean");
        assert_eq!(Value::from(Utc::now()).type_name(), "timestamp");
        assert_eq!(Value::from(vec![1u8]).type_name(), "bytes");
        assert_eq!(Value::from(Mapping::new()).type_name(), "mapping");
    }

    #[test]
    fn test_serialized_shape_is_adjacently_tagged() {
        let json = serde_json::to_string(&Value::Integer(42)).unwrap();
        assert_eq!(json, r#"{"type":"integer","value":42}"#);

        let json = serde_json::to_string(&Value::Bytes(vec![0xde, 0xad])).unwrap();
        assert_eq!(json, r#"{"type":"bytes","value":"dead"}"#);
    }

    #[test]
    fn test_timestamp_keeps_nanoseconds() {
        let ts = Utc.timestamp_opt(1_723_400_000, 123_456_789).unwrap();
        let json = serde_json::to_vec(&Value::Timestamp(ts)).unwrap();
        let back: Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, Value::Timestamp(ts));
    }

    #[test]
    fn test_depth() {
        assert_eq!(Value::from(1).depth(), 0);

        let mut inner = Mapping::new();
        inner.insert("x".to_string(), Value::from(1));
        let mut outer = Mapping::new();
        outer.insert("inner".to_string(), Value::Mapping(inner));
        outer.insert("flat".to_string(), Value::from("s"));

        assert_eq!(Value::Mapping(outer).depth(), 2);
        assert_eq!(Value::Mapping(Mapping::new()).depth(), 1);
    }

    #[test]
    fn test_integer_coercions() {
        assert_eq!(Value::from(7).coerce_integer(), Some(7));
        assert_eq!(Value::from(true).coerce_integer(), Some(1));
        assert_eq!(Value::from(" 12 ").coerce_integer(), Some(12));
        assert_eq!(Value::from("twelve").coerce_integer(), None);
        assert_eq!(Value::from(vec![1u8]).coerce_integer(), None);
    }

    #[test]
    fn test_boolean_coercions() {
        assert_eq!(Value::from(0).coerce_boolean(), Some(false));
        assert_eq!(Value::from(-3).coerce_boolean(), Some(true));
        assert_eq!(Value::from("YES").coerce_boolean(), Some(true));
        assert_eq!(Value::from("no").coerce_boolean(), Some(false));
        assert_eq!(Value::from("maybe").coerce_boolean(), None);
    }

    #[test]
    fn test_string_and_timestamp_coercions() {
        assert_eq!(Value::from(5).coerce_string().as_deref(), Some("5"));
        assert_eq!(Value::from(false).coerce_string().as_deref(), Some("false"));
        assert_eq!(Value::Mapping(Mapping::new()).coerce_string(), None);

        let ts = Value::from("2024-08-11T10:00:00Z").coerce_timestamp().unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 8, 11, 10, 0, 0).unwrap());
        assert_eq!(Value::from(1).coerce_timestamp(), None);
    }

    #[test]
    fn test_bytes_coercions() {
        assert_eq!(Value::from(vec![1u8, 2]).coerce_bytes(), Some(vec![1, 2]));
        assert_eq!(Value::from("blob").coerce_bytes(), None);
        assert_eq!(Value::from(3).coerce_bytes(), None);
    }

    #[test]
    fn test_display() {
        let mut map = Mapping::new();
        map.insert("b".to_string(), Value::from(true));
        map.insert("a".to_string(), Value::from("x"));
        assert_eq!(Value::Mapping(map).to_string(), r#"{"a": "x", "b": true}"#);
        assert_eq!(Value::from(vec![0x0a, 0xff]).to_string(), "<0aff>");
    }
}
