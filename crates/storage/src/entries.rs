//! Entry map shared by the store backends
//!
//! `Entries` is the unlocked state behind both `MemoryStore` and
//! `FileStore`: an ordered map plus a running byte count for quota checks.
//! Callers wrap it in a lock; every method here assumes exclusive access
//! for writes.

use std::collections::BTreeMap;

use keystash_core::{Error, Result};
use tracing::warn;

/// Ordered key/value entries with optional byte quota
///
/// Size of an entry is `key.len() + value.len()` in UTF-8 bytes.
#[derive(Debug, Default)]
pub(crate) struct Entries {
    map: BTreeMap<String, String>,
    bytes: usize,
    quota: Option<usize>,
}

impl Entries {
    pub(crate) fn new(quota: Option<usize>) -> Self {
        Self {
            map: BTreeMap::new(),
            bytes: 0,
            quota,
        }
    }

    /// Build from existing entries (e.g. loaded from disk)
    ///
    /// Existing data is accepted even if it is over quota; only new writes
    /// are checked.
    pub(crate) fn from_map(map: BTreeMap<String, String>, quota: Option<usize>) -> Self {
        let bytes = map.iter().map(|(k, v)| k.len() + v.len()).sum();
        Self { map, bytes, quota }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&String> {
        self.map.get(key)
    }

    /// Insert or overwrite, enforcing the quota
    ///
    /// On rejection the map is left untouched.
    pub(crate) fn insert(&mut self, key: &str, value: String) -> Result<()> {
        let old = self.map.get(key).map_or(0, |v| key.len() + v.len());
        let required = self.bytes - old + key.len() + value.len();
        if let Some(limit) = self.quota {
            if required > limit {
                warn!(key, required, limit, "write rejected: quota exceeded");
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    required,
                    limit,
                });
            }
        }
        self.map.insert(key.to_string(), value);
        self.bytes = required;
        Ok(())
    }

    /// Put back a prior state for `key` without a quota check
    ///
    /// Used to undo a mutation whose persistence failed.
    pub(crate) fn restore(&mut self, key: &str, previous: Option<String>) {
        self.remove(key);
        if let Some(value) = previous {
            self.bytes += key.len() + value.len();
            self.map.insert(key.to_string(), value);
        }
    }

    /// Remove an entry, returning whether it existed
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        match self.map.remove(key) {
            Some(v) => {
                self.bytes -= key.len() + v.len();
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.bytes = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    /// Bytes currently held
    pub(crate) fn bytes(&self) -> usize {
        self.bytes
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, String> {
        &self.map
    }
}
