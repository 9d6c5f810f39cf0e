//! Domain maintenance commands:
//! - `easy-defaults delete <key>` - Remove one key
//! - `easy-defaults keys` - List keys
//! - `easy-defaults clear` - Erase the whole domain

use anyhow::Result;

use crate::store::DefaultsStore;

/// Execute the delete command.
pub fn delete(store: &DefaultsStore, key: &str) -> Result<()> {
    if store.try_remove(key)? {
        store.try_flush()?;
        println!("Deleted '{key}'");
    } else {
        println!("Key '{key}' not found in domain '{}'", store.namespace());
    }
    Ok(())
}

/// Execute the keys command.
pub fn keys(store: &DefaultsStore) -> Result<()> {
    for key in store.try_keys()? {
        println!("{key}");
    }
    Ok(())
}

/// Execute the clear command.
pub fn clear(store: &DefaultsStore) -> Result<()> {
    let count = store.try_keys()?.len();
    store.try_clear()?;
    println!(
        "Cleared domain '{}' ({count} {})",
        store.namespace(),
        if count == 1 { "entry" } else { "entries" }
    );
    Ok(())
}
