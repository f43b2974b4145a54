//! MemoryStore: in-process string map
//!
//! Implements `KeyValueStore` over a `BTreeMap<String, String>` behind a
//! `parking_lot::RwLock`. Contents live as long as the store value; share
//! it with `Arc` to give several accessors one map.

use parking_lot::RwLock;

use keystash_core::{KeyValueStore, Result};

use crate::entries::Entries;

/// In-memory backend with optional byte quota
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<Entries>,
}

impl MemoryStore {
    /// Create an empty store with no quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that refuses writes beyond `quota_bytes`
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(Entries::new(Some(quota_bytes))),
        }
    }

    /// Create a store pre-populated with `entries`
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RwLock::new(Entries::from_map(map, None)),
        }
    }

    /// Bytes currently held (keys plus values)
    pub fn used_bytes(&self) -> usize {
        self.entries.read().bytes()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.entries.write().insert(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }

    fn keys(&self) -> Vec<String> {
        self.entries.read().keys()
    }
}
