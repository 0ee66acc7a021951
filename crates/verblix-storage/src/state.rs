use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects::KeyValueStore;

/// Load a JSON document. Returns `Ok(None)` when the key is absent.
pub fn load_state<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(contents) => Ok(Some(serde_json::from_str(&contents)?)),
        None => Ok(None),
    }
}

/// Serialize and store a JSON document, replacing any previous value.
pub fn save_state<T: Serialize>(
    store: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let body = serde_json::to_string(value)?;
    store.set(key, &body)
}
