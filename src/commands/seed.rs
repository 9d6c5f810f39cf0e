//! `easy-defaults seed` - fill a domain with sample values.
//!
//! Each round writes one value of every kind under consecutive numeric keys,
//! continuing from the `counter` entry:
//!
//! 1. a string
//! 2. an integer
//! 3. a boolean
//! 4. the current timestamp
//! 5. a JSON-encoded sample object stored as bytes
//!
//! Afterwards `my_string` and `my_bool` are set, so an inspector has both
//! anonymous and well-known keys to look at.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::DefaultsStore;

/// Key holding the last numeric key written.
pub const COUNTER_KEY: &str = "counter";
/// Well-known string key.
pub const MY_STRING_KEY: &str = "my_string";
/// Well-known boolean key.
pub const MY_BOOL_KEY: &str = "my_bool";

const SAMPLE_STRING: &str = "Easy Defaults Test Value";
const MY_STRING_VALUE: &str = "My test string";

/// Sample object stored as an encoded blob.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SampleObject {
    object_string: String,
    object_int: i64,
    object_bool: bool,
}

/// Outcome of a seed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// First numeric key written.
    pub first_key: i64,
    /// Last numeric key written.
    pub last_key: i64,
}

impl SeedReport {
    /// Number of numeric keys written.
    pub fn written(&self) -> i64 {
        self.last_key - self.first_key + 1
    }
}

/// Writes `rounds` rounds of sample values stamped with `now`.
///
/// # Errors
///
/// Returns an error if any write or the final flush fails, or if the
/// numeric keys would run past `i64::MAX`. The counter is left untouched
/// in that case.
pub fn seed(store: &DefaultsStore, rounds: u32, now: DateTime<Utc>) -> Result<SeedReport> {
    let mut counter = store.get_integer(COUNTER_KEY);
    let first_key = next_key(counter)?;

    for _ in 0..rounds {
        counter = next_key(counter)?;
        store.try_set(&counter.to_string(), SAMPLE_STRING.into())?;

        counter = next_key(counter)?;
        let sample = counter.wrapping_mul(37).rem_euclid(100);
        store.try_set(&counter.to_string(), sample.into())?;

        counter = next_key(counter)?;
        store.try_set(&counter.to_string(), (counter % 2 == 0).into())?;

        counter = next_key(counter)?;
        store.try_set(&counter.to_string(), now.into())?;

        counter = next_key(counter)?;
        let object = SampleObject {
            object_string: "objectStringValue".to_string(),
            object_int: 10,
            object_bool: counter % 2 == 0,
        };
        let encoded = serde_json::to_vec(&object)?;
        store.try_set(&counter.to_string(), encoded.into())?;
    }

    let last_key = counter;
    store.try_set(COUNTER_KEY, last_key.into())?;
    store.try_set(MY_STRING_KEY, MY_STRING_VALUE.into())?;
    store.try_set(MY_BOOL_KEY, true.into())?;
    store.try_flush()?;

    tracing::debug!(namespace = %store.namespace(), first_key, last_key, "Seeded domain");

    Ok(SeedReport {
        first_key,
        last_key,
    })
}

/// Numeric key following `counter`.
fn next_key(counter: i64) -> Result<i64> {
    counter
        .checked_add(1)
        .with_context(|| format!("counter {counter} cannot advance past i64::MAX"))
}

/// Execute the seed command.
pub fn execute(store: &DefaultsStore, rounds: u32) -> Result<()> {
    if rounds == 0 {
        println!("Nothing to seed (--count 0)");
        return Ok(());
    }

    let report = seed(store, rounds, Utc::now())?;
    println!(
        "Seeded {} values into '{}' (keys {}..={})",
        report.written(),
        store.namespace(),
        report.first_key,
        report.last_key
    );
    println!(
        "{MY_STRING_KEY}: {}",
        store.get_string(MY_STRING_KEY)
    );
    println!("{MY_BOOL_KEY}: {}", store.get_boolean(MY_BOOL_KEY));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Namespace;
    use crate::value::Value;
    use chrono::TimeZone;

    fn store() -> DefaultsStore {
        DefaultsStore::memory(Namespace::new("com.test.EasyDefaultsTestApp").unwrap())
    }

    #[test]
    fn test_seed_writes_every_kind() {
        let store = store();
        let now = Utc.with_ymd_and_hms(2024, 8, 17, 12, 0, 0).unwrap();

        let report = seed(&store, 1, now).unwrap();
        assert_eq!(report, SeedReport { first_key: 1, last_key: 5 });
        assert_eq!(report.written(), 5);

        assert_eq!(store.get_string("1"), SAMPLE_STRING);
        assert!(matches!(store.get("2"), Some(Value::Integer(_))));
        assert!(matches!(store.get("3"), Some(Value::Boolean(_))));
        assert_eq!(store.get_timestamp("4"), Some(now));

        let object = store.get_mapping("5").unwrap();
        assert_eq!(object["objectString"], Value::from("objectStringValue"));
        assert_eq!(object["objectInt"], Value::Integer(10));

        assert_eq!(store.get_string(MY_STRING_KEY), MY_STRING_VALUE);
        assert!(store.get_boolean(MY_BOOL_KEY));
    }

    #[test]
    fn test_seed_continues_from_counter() {
        let store = store();
        let now = Utc::now();

        seed(&store, 2, now).unwrap();
        assert_eq!(store.get_integer(COUNTER_KEY), 10);

        let report = seed(&store, 1, now).unwrap();
        assert_eq!(report.first_key, 11);
        assert_eq!(report.last_key, 15);
    }

    #[test]
    fn test_seed_after_clear_restarts() {
        let store = store();
        seed(&store, 1, Utc::now()).unwrap();
        store.clear();

        let report = seed(&store, 1, Utc::now()).unwrap();
        assert_eq!(report.first_key, 1);
    }

    #[test]
    fn test_seed_from_large_counter() {
        let store = store();
        store.set_integer(COUNTER_KEY, i64::MAX / 10);

        let report = seed(&store, 1, Utc::now()).unwrap();
        assert_eq!(report.first_key, i64::MAX / 10 + 1);
        assert_eq!(report.written(), 5);

        let sample = store.get_integer(&(report.first_key + 1).to_string());
        assert!((0..100).contains(&sample));
        assert_eq!(store.get_integer(COUNTER_KEY), report.last_key);
    }

    #[test]
    fn test_seed_at_counter_limit_fails() {
        let store = store();
        store.set_integer(COUNTER_KEY, i64::MAX);
        assert!(seed(&store, 1, Utc::now()).is_err());
        assert_eq!(store.get_integer(COUNTER_KEY), i64::MAX);

        store.set_integer(COUNTER_KEY, i64::MAX - 3);
        assert!(seed(&store, 1, Utc::now()).is_err());
        assert_eq!(store.get_integer(COUNTER_KEY), i64::MAX - 3);
    }
}
