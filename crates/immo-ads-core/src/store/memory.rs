//! In-memory [`HistoryStore`] implementation for tests.
//!
//! Histories are kept in their encoded JSON form so that the
//! empty-content and malformed-content paths behave exactly like a
//! file-backed store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use crate::key::HistoryKey;
use crate::models::Listing;

use super::{HistoryError, HistoryStore};

/// In-memory history store keyed by [`HistoryKey`].
#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<HashMap<HistoryKey, String>>,
    writes: AtomicUsize,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw stored content for `key`, bypassing encoding.
    pub fn insert_raw(&self, key: &HistoryKey, content: impl Into<String>) {
        self.entries
            .write()
            .unwrap()
            .insert(key.clone(), content.into());
    }

    /// Number of [`replace`](HistoryStore::replace) calls served so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn contains(&self, key: &HistoryKey) -> bool {
        self.entries.read().unwrap().contains_key(key)
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn load(&self, key: &HistoryKey) -> Result<Vec<Listing>, HistoryError> {
        let entries = self.entries.read().unwrap();
        match entries.get(key) {
            None => Ok(Vec::new()),
            Some(content) if content.is_empty() => Ok(Vec::new()),
            Some(content) => {
                serde_json::from_str(content).map_err(|source| HistoryError::Malformed {
                    key: key.clone(),
                    source,
                })
            }
        }
    }

    fn replace(&self, key: &HistoryKey, listings: &[Listing]) -> Result<(), HistoryError> {
        let content = serde_json::to_string(listings).map_err(|source| HistoryError::Encode {
            key: key.clone(),
            source,
        })?;
        self.entries.write().unwrap().insert(key.clone(), content);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::derive_key;
    use crate::store::HISTORY_CAPACITY;
    use serde_json::json;

    fn listings(ids: std::ops::Range<i64>) -> Vec<Listing> {
        ids.map(|id| serde_json::from_value(json!({ "id": id, "rooms": 2 })).unwrap())
            .collect()
    }

    #[test]
    fn test_unknown_key_loads_empty() {
        let store = InMemoryHistoryStore::new();
        assert!(store.load(&derive_key("nothing yet")).unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let store = InMemoryHistoryStore::new();
        let key = derive_key("Flat in Springfield");
        let history = listings(0..12);
        store.save(&key, &history, &[]).unwrap();
        assert_eq!(store.load(&key).unwrap(), history);
    }

    #[test]
    fn test_save_bounds_history() {
        let store = InMemoryHistoryStore::new();
        let key = derive_key("bounded");
        let written = store.save(&key, &listings(50..60), &listings(0..30)).unwrap();
        let loaded = store.load(&key).unwrap();
        assert_eq!(loaded.len(), HISTORY_CAPACITY);
        assert_eq!(loaded, written);
        assert_eq!(loaded[0].id(), &json!(50));
        assert_eq!(loaded[29].id(), &json!(19));
    }

    #[test]
    fn test_empty_content_loads_empty() {
        let store = InMemoryHistoryStore::new();
        let key = derive_key("blank");
        store.insert_raw(&key, "");
        assert!(store.load(&key).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_content_is_an_error() {
        let store = InMemoryHistoryStore::new();
        let key = derive_key("broken");
        store.insert_raw(&key, "[{\"id\": 1},");
        assert!(matches!(
            store.load(&key),
            Err(HistoryError::Malformed { .. })
        ));
    }

    #[test]
    fn test_keys_are_isolated() {
        let store = InMemoryHistoryStore::new();
        store
            .save(&derive_key("one"), &listings(0..2), &[])
            .unwrap();
        assert!(store.load(&derive_key("two")).unwrap().is_empty());
        assert_eq!(store.write_count(), 1);
    }
}
