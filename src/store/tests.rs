//! Tests for the defaults store facade.

use super::*;
use crate::value::{Mapping, Value};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn app() -> Namespace {
    Namespace::new("com.test.EasyDefaultsTestApp").unwrap()
}

fn custom_object() -> Mapping {
    let mut map = Mapping::new();
    map.insert("objectString".to_string(), Value::from("objectStringValue"));
    map.insert("objectInt".to_string(), Value::Integer(10));
    map.insert("objectBool".to_string(), Value::Boolean(true));
    map
}

#[test]
fn test_typed_round_trips() {
    let store = DefaultsStore::memory(app());
    let ts = Utc.with_ymd_and_hms(2024, 8, 11, 12, 0, 0).unwrap();

    store.set_string("s", "Easy Defaults Test Value");
    store.set_integer("i", 42);
    store.set_boolean("b", true);
    store.set_timestamp("t", ts);
    store.set_bytes("d", vec![0u8, 1, 2, 255]);

    assert_eq!(store.get_string("s"), "Easy Defaults Test Value");
    assert_eq!(store.get_integer("i"), 42);
    assert!(store.get_boolean("b"));
    assert_eq!(store.get_timestamp("t"), Some(ts));
    assert_eq!(store.get_bytes("d"), Some(vec![0u8, 1, 2, 255]));
}

#[test]
fn test_absent_keys_return_zero_values() {
    let store = DefaultsStore::memory(app());

    assert_eq!(store.get_string("missing"), "");
    assert_eq!(store.get_integer("missing"), 0);
    assert!(!store.get_boolean("missing"));
    assert_eq!(store.get_timestamp("missing"), None);
    assert_eq!(store.get_bytes("missing"), None);
    assert_eq!(store.get_mapping("missing"), None);
    assert_eq!(store.get("missing"), None);
}

#[test]
fn test_overwrite_replaces_type() {
    let store = DefaultsStore::memory(app());

    store.set_bytes("k", b"blob".to_vec());
    store.set_integer("k", 7);

    assert_eq!(store.get("k"), Some(Value::Integer(7)));
    assert_eq!(store.get_bytes("k"), None);
    assert_eq!(store.get_mapping("k"), None);
}

#[test]
fn test_mapping_round_trip() {
    let store = DefaultsStore::memory(app());

    let mut map = custom_object();
    let mut nested = Mapping::new();
    nested.insert("when".to_string(), Value::Timestamp(Utc.timestamp_opt(0, 5).unwrap()));
    map.insert("nested".to_string(), Value::Mapping(nested));

    store.set_mapping("object", &map);

    // Stored as opaque bytes, decoded on read.
    assert!(matches!(store.get("object"), Some(Value::Bytes(_))));
    assert_eq!(store.get_mapping("object"), Some(map));
}

#[test]
fn test_get_mapping_reads_plain_json_blob() {
    let store = DefaultsStore::memory(app());
    let json = serde_json::json!({
        "objectString": "objectStringValue",
        "objectInt": 10,
        "objectBool": true,
    });
    store.set_bytes("encoded", serde_json::to_vec(&json).unwrap());

    assert_eq!(store.get_mapping("encoded"), Some(custom_object()));
}

#[test]
fn test_get_mapping_on_corrupt_bytes_is_absent() {
    let store = DefaultsStore::memory(app());
    store.set_bytes("corrupt", b"\x00\x01 definitely not json".to_vec());

    assert_eq!(store.get_mapping("corrupt"), None);
    // The raw bytes are still there.
    assert!(store.get_bytes("corrupt").is_some());
}

#[test]
fn test_get_mapping_accepts_stored_mapping_value() {
    let store = DefaultsStore::memory(app());
    store.set("direct", Value::Mapping(custom_object()));

    assert_eq!(store.get_mapping("direct"), Some(custom_object()));
}

#[test]
fn test_set_mapping_skips_unencodable_mapping() {
    let store = DefaultsStore::memory(app());
    store.set_string("deep", "previous");

    let mut map = Mapping::new();
    for _ in 0..=crate::codec::MAX_NESTING_DEPTH {
        let mut outer = Mapping::new();
        outer.insert("child".to_string(), Value::Mapping(map));
        map = outer;
    }
    store.set_mapping("deep", &map);

    assert_eq!(store.get_string("deep"), "previous");
}

#[test]
fn test_empty_key_is_ignored() {
    let store = DefaultsStore::memory(app());

    store.set_string("", "value");
    assert!(store.try_set("", Value::from(1)).is_err());
    assert!(store.keys().is_empty());
    assert_eq!(store.get_string(""), "");
}

#[test]
fn test_coercing_getters() {
    let store = DefaultsStore::memory(app());

    store.set_string("number", "17");
    store.set_integer("flag", 1);
    store.set_boolean("truth", true);

    assert_eq!(store.get_integer("number"), 17);
    assert!(store.get_boolean("flag"));
    assert_eq!(store.get_integer("truth"), 1);
    assert_eq!(store.get_string("flag"), "1");
    assert_eq!(store.get_timestamp("number"), None);
}

#[test]
fn test_bytes_overwritten_by_string_read_as_absent() {
    let store = DefaultsStore::memory(app());

    store.set_bytes("blob", vec![0u8, 1, 2]);
    store.set_string("blob", "now text");

    assert_eq!(store.get_bytes("blob"), None);
    assert_eq!(store.get_mapping("blob"), None);
    assert_eq!(store.get_string("blob"), "now text");
}

#[test]
fn test_clear_empties_namespace() {
    let store = DefaultsStore::memory(app());

    store.set_string("my_string", "My test string");
    store.set_boolean("my_bool", true);
    store.set_integer("counter", 4);
    store.set_mapping("object", &custom_object());

    store.clear();

    assert!(store.keys().is_empty());
    assert_eq!(store.get_string("my_string"), "");
    assert!(!store.get_boolean("my_bool"));
    assert_eq!(store.get_integer("counter"), 0);
    assert_eq!(store.get_mapping("object"), None);
}

#[test]
fn test_clear_leaves_other_namespaces() {
    let store = DefaultsStore::memory(app());
    let other = store.with_namespace(Namespace::new("com.test.other").unwrap());

    store.set_integer("k", 1);
    other.set_integer("k", 2);

    store.clear();

    assert_eq!(store.get_integer("k"), 0);
    assert_eq!(other.get_integer("k"), 2);
}

#[test]
fn test_remove_and_contains() {
    let store = DefaultsStore::memory(app());

    store.set_boolean("flag", false);
    assert!(store.contains("flag"));
    assert!(store.remove("flag"));
    assert!(!store.contains("flag"));
    assert!(!store.remove("flag"));
}

#[test]
fn test_snapshot_and_sorted_keys() {
    let store = DefaultsStore::memory(app());

    store.set_integer("2", 5);
    store.set_string("1", "a");
    store.set_boolean("3", true);

    assert_eq!(store.keys(), vec!["1", "2", "3"]);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 3);
    assert_eq!(snapshot["1"], Value::from("a"));
    assert_eq!(snapshot["2"], Value::Integer(5));
    assert_eq!(snapshot["3"], Value::Boolean(true));
}

#[test]
fn test_undecodable_entry_reads_as_absent() {
    let backend = Arc::new(MemoryBackend::new());
    let ns = app();
    backend.write(&ns, "garbage", b"not an entry".to_vec()).unwrap();

    let store = DefaultsStore::from_shared(ns, backend);
    assert_eq!(store.get("garbage"), None);
    assert_eq!(store.get_string("garbage"), "");
    assert!(store.snapshot().is_empty());
    assert_eq!(store.keys(), vec!["garbage"]);
}

#[test]
fn test_redb_persistence_across_reopens() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("defaults.redb");

    {
        let store = DefaultsStore::redb(&path, app()).unwrap();
        store.set_string("my_string", "My test string");
        store.set_mapping("object", &custom_object());
    }

    let store = DefaultsStore::redb(&path, app()).unwrap();
    assert_eq!(store.get_string("my_string"), "My test string");
    assert_eq!(store.get_mapping("object"), Some(custom_object()));

    store.clear();
    drop(store);

    let store = DefaultsStore::redb(&path, app()).unwrap();
    assert!(store.keys().is_empty());
}

#[test]
fn test_file_persistence_and_clear() {
    let tmp = TempDir::new().unwrap();

    {
        let store = DefaultsStore::file(tmp.path(), app()).unwrap();
        store.set_integer("counter", 9);
        store.flush();
    }

    let store = DefaultsStore::file(tmp.path(), app()).unwrap();
    assert_eq!(store.get_integer("counter"), 9);

    store.clear();
    assert_eq!(store.get_integer("counter"), 0);
    assert!(!tmp.path().join("com.test.EasyDefaultsTestApp.json").exists());
}

#[test]
fn test_concurrent_writers_through_clones() {
    let store = DefaultsStore::memory(app());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..50 {
                    store.set_integer(&format!("t{t}-{i}"), i);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.keys().len(), 8 * 50);
    assert_eq!(store.get_integer("t3-49"), 49);
}
