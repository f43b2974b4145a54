//! PathStore: path-resolving accessor over a string store
//!
//! ## Design
//!
//! PathStore is a stateless facade over a [`KeyValueStore`]. It holds no
//! copies of stored data; every call goes to the backend.
//!
//! ## Operations
//!
//! | Operation | Backend calls |
//! |-----------|---------------|
//! | `set(key, value)` | `set_item(key, encode(value))` |
//! | `get("root")` | `get_item("root")`, then decode |
//! | `get("root.a.0")` | `get_item("root")`, decode, walk `a` then `0` |
//! | `remove(key)` | `remove_item(key)` |
//! | `clear()` | `clear()` |
//!
//! Only `get` interprets dots. `set` and `remove` treat the key as opaque,
//! so `set("a.b", ..)` writes a store key literally named `a.b`, which a
//! later `get("a.b")` will not find (it looks up root `a`).
//!
//! ## Absence
//!
//! `get` returns `Ok(None)` for a missing root key, a key with an empty
//! root segment (`".a"`, `"...."`), a segment that does not resolve, and a
//! value that decodes to JSON `null`.

use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use keystash_core::{
    codec, take_at_path, Error, KeyPath, KeyValueStore, PresenceCheck, Result, Value,
    PATH_SEPARATOR,
};

/// Path-addressed accessor over a flat string store
///
/// # Example
///
/// ```
/// use keystash_api::PathStore;
/// use keystash_core::Value;
/// use keystash_storage::MemoryStore;
///
/// let store = PathStore::new(MemoryStore::new());
/// let user: Value = serde_json::json!({"addresses": [{"city": "Lisbon"}]}).into();
///
/// store.set("user", user).unwrap();
/// assert_eq!(
///     store.get("user.addresses.0.city").unwrap(),
///     Some(Value::from("Lisbon"))
/// );
/// assert_eq!(store.get("user.addresses.5.city").unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct PathStore<S> {
    store: S,
    presence: PresenceCheck,
}

impl<S: KeyValueStore> PathStore<S> {
    /// Wrap a backend with the default [`PresenceCheck::Defined`] traversal
    pub fn new(store: S) -> Self {
        Self::with_presence(store, PresenceCheck::default())
    }

    /// Wrap a backend with an explicit traversal presence rule
    pub fn with_presence(store: S, presence: PresenceCheck) -> Self {
        Self { store, presence }
    }

    /// Presence rule used by dotted `get`
    pub fn presence(&self) -> PresenceCheck {
        self.presence
    }

    /// Borrow the backend
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unwrap the backend
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Store `value` under `key`
    ///
    /// Arrays, objects and null are written as JSON; other primitives as
    /// their plain text. `key` is written as-is, dots included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedValue`] for a function value (nothing is
    /// written), or whatever the backend reports for the write.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let encoded = codec::encode(&value)?;
        debug!(key, kind = value.type_name(), bytes = encoded.len(), "set");
        self.store.set_item(key, encoded)
    }

    /// Read the value at `key`, walking into it if `key` is dotted
    ///
    /// Plain keys return the decoded value, or the raw text as a string
    /// when it is not valid JSON. Dotted keys decode the root value and
    /// walk the remaining segments.
    ///
    /// # Errors
    ///
    /// Only backend read failures are errors; absence is `Ok(None)`.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        if !key.contains(PATH_SEPARATOR) {
            trace!(key, "get");
            return Ok(self.read_root(key)?.and_then(non_null));
        }

        let path: KeyPath = match key.parse() {
            Ok(path) => path,
            Err(e) => {
                trace!(key, error = %e, "get: unusable key path");
                return Ok(None);
            }
        };
        trace!(key, root = path.root(), depth = path.segments().len(), "get path");

        let root = match self.read_root(path.root())? {
            Some(root) => root,
            None => return Ok(None),
        };
        Ok(take_at_path(root, path.segments(), self.presence).and_then(non_null))
    }

    /// Read the value at `key` and convert it into `T`
    ///
    /// The conversion goes through JSON, so `T` is any `Deserialize` type
    /// whose shape matches the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the value does not fit `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)?
            .map(|value| {
                serde_json::from_value(value.to_json()).map_err(|e| {
                    Error::Serialization(format!("value at '{}' does not fit: {}", key, e))
                })
            })
            .transpose()
    }

    /// Delete the entry at `key`; absent keys are a no-op
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports for the removal.
    pub fn remove(&self, key: &str) -> Result<()> {
        debug!(key, "remove");
        self.store.remove_item(key)
    }

    /// Delete every entry in the backend
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports for the clear.
    pub fn clear(&self) -> Result<()> {
        debug!(entries = self.store.len(), "clear");
        self.store.clear()
    }

    /// Number of root keys in the backend
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// True if the backend holds no entries
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Root keys in the backend
    pub fn keys(&self) -> Vec<String> {
        self.store.keys()
    }

    /// Fetch and decode the value stored at a root key
    fn read_root(&self, key: &str) -> Result<Option<Value>> {
        let raw = match self.store.get_item(key)? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        // Empty text is falsy, so the truthy rule treats it as missing
        if raw.is_empty() && self.presence == PresenceCheck::Truthy {
            return Ok(None);
        }
        Ok(Some(codec::decode(&raw)))
    }
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}
