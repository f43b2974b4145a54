//! Core types and traits for keystash
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: logical value stored under a root key
//! - codec: text encoding/decoding policy for a string-only store
//! - KeyPath / PathSegment: dotted key parsing and traversal
//! - KeyValueStore: the backing store abstraction
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod path;
pub mod traits;
pub mod value;

pub use codec::{decode, encode, try_decode};
pub use error::{Error, Result};
pub use path::{
    take_at_path, KeyPath, PathParseError, PathSegment, PresenceCheck, PATH_SEPARATOR,
};
pub use traits::KeyValueStore;
pub use value::{Callable, Value};
