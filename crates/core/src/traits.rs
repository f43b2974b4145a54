//! Core trait for the backing string store
//!
//! This module defines the KeyValueStore trait that lets the path-resolving
//! layer run over any flat string map: an in-process map, a file on disk,
//! or a test double that records every call.

use std::sync::Arc;

use crate::error::Result;

/// Flat, persistent string-to-string map
///
/// This is the whole collaborator surface the accessor layer consumes. Keys
/// are opaque; implementations never interpret dots.
///
/// Methods take `&self` so one backend can be shared (via `Arc` or `&`) by
/// several accessors. Concurrent writers see last-writer-wins semantics;
/// there is no cross-key atomicity.
///
/// Thread safety: implementations must be `Send + Sync`.
pub trait KeyValueStore: Send + Sync {
    /// Raw text stored at `key`, `None` if absent
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` at `key`, overwriting any existing entry
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the write (for example
    /// [`Error::QuotaExceeded`](crate::Error::QuotaExceeded)) or cannot
    /// persist it.
    fn set_item(&self, key: &str, value: String) -> Result<()>;

    /// Delete the entry at `key`; absent keys are a no-op
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the removal.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Delete every entry
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the removal.
    fn clear(&self) -> Result<()>;

    /// Number of entries
    fn len(&self) -> usize;

    /// True if the store holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys, in the backend's iteration order
    fn keys(&self) -> Vec<String>;
}

macro_rules! forward_key_value_store {
    ($($ty:ty),* $(,)?) => {$(
        impl<S: KeyValueStore + ?Sized> KeyValueStore for $ty {
            fn get_item(&self, key: &str) -> Result<Option<String>> {
                (**self).get_item(key)
            }

            fn set_item(&self, key: &str, value: String) -> Result<()> {
                (**self).set_item(key, value)
            }

            fn remove_item(&self, key: &str) -> Result<()> {
                (**self).remove_item(key)
            }

            fn clear(&self) -> Result<()> {
                (**self).clear()
            }

            fn len(&self) -> usize {
                (**self).len()
            }

            fn keys(&self) -> Vec<String> {
                (**self).keys()
            }
        }
    )*};
}

forward_key_value_store!(&S, Arc<S>, Box<S>);
