//! Shared test utilities for the integration test suites.
//!
//! Import via `mod common;` from any test file.

#![allow(dead_code)]

use keystash::{KeyValueStore, MemoryStore, PathStore, Result};
use parking_lot::Mutex;

/// One call observed on the backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get(String),
    Set(String, String),
    Remove(String),
    Clear,
}

/// MemoryStore that records every call made through the store trait
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Raw text at `key`, bypassing the recorder
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).unwrap()
    }

    /// Write raw text, bypassing the recorder
    pub fn put_raw(&self, key: &str, value: &str) {
        self.inner.set_item(key, value.to_string()).unwrap();
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().push(call);
    }
}

impl KeyValueStore for RecordingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.record(StoreCall::Get(key.to_string()));
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: String) -> Result<()> {
        self.record(StoreCall::Set(key.to_string(), value.clone()));
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.record(StoreCall::Remove(key.to_string()));
        self.inner.remove_item(key)
    }

    fn clear(&self) -> Result<()> {
        self.record(StoreCall::Clear);
        self.inner.clear()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }
}

/// PathStore over a fresh recording backend
pub fn recording_store() -> PathStore<RecordingStore> {
    PathStore::new(RecordingStore::new())
}
