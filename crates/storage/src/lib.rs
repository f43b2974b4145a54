//! Storage backends for keystash
//!
//! This crate implements the `KeyValueStore` trait with:
//! - MemoryStore: `BTreeMap` behind a `parking_lot::RwLock`
//! - FileStore: the same map mirrored to a JSON file with atomic rewrites
//!
//! Both backends support an optional byte quota. A write that would exceed
//! it fails with `Error::QuotaExceeded` and changes nothing; nothing is
//! evicted to make room.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod entries;
pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;
