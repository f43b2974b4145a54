//! Keystash - path-addressed accessor over persistent string stores
//!
//! Keystash wraps a flat string-to-string store (in memory or on disk) and
//! lets callers write structured values under a key and read nested parts
//! of them back with dotted paths.
//!
//! # Quick Start
//!
//! ```
//! use keystash::{PathStore, MemoryStore, Value};
//!
//! let store = PathStore::new(MemoryStore::new());
//! store.set("user", Value::from(serde_json::json!({"name": "Alice", "tags": ["a", "b"]})))?;
//!
//! assert_eq!(store.get("user.name")?, Some(Value::from("Alice")));
//! assert_eq!(store.get("user.tags.1")?, Some(Value::from("b")));
//! assert_eq!(store.get("user.missing")?, None);
//! # Ok::<(), keystash::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `keystash-core`: value model, codec, key paths, store trait
//! - `keystash-storage`: memory and file backends
//! - `keystash-api`: `PathStore`, configuration
//!
//! Only the API layer is re-exported here, plus the core `codec` and `path`
//! modules for callers that work with stored text directly.

pub use keystash_api::*;
pub use keystash_core::{codec, path};
