//! Public API layer for keystash
//!
//! This crate provides the public interface to a store:
//! - [`PathStore`]: `set` / `get` / `remove` / `clear` over any
//!   [`KeyValueStore`], with dotted-path reads into stored structures
//! - [`StoreConfig`] and [`open`]: pick a backend from `keystash.toml`
//!
//! ## Quick Start
//!
//! ```
//! use keystash_api::{open, StoreConfig};
//! use keystash_core::Value;
//!
//! let store = open(&StoreConfig::memory()).unwrap();
//! store.set("test", Value::from(serde_json::json!({"a": [{"b": 10}]}))).unwrap();
//!
//! assert_eq!(store.get("test.a.0.b").unwrap(), Some(Value::Int(10)));
//! assert_eq!(store.get("test.a.10.b").unwrap(), None);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod store;

pub use config::{open, BackendKind, StoreConfig, CONFIG_FILE_NAME};
pub use store::PathStore;

pub use keystash_core::{Callable, Error, KeyValueStore, PresenceCheck, Result, Value};
pub use keystash_storage::{FileStore, MemoryStore};
