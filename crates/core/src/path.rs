//! Dotted key paths
//!
//! This module defines:
//! - KeyPath: a root store key plus the segments to walk inside its value
//!   (e.g. `user.addresses.0.city`)
//! - PathSegment: one step of the walk (Field or Index)
//! - PresenceCheck: what counts as "found" while walking
//!
//! # Path Syntax
//!
//! | Syntax | Meaning | Example |
//! |--------|---------|---------|
//! | `root` | Whole value at store key `root` | `user` |
//! | `root.name` | Object field | `user.name` |
//! | `root.n` | Array index (digits only) | `user.tags.0` |
//!
//! Keys are split on every `.`, so `a..b` has an empty field segment
//! between `a` and `b`. There is no escaping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::value::Value;

/// Separator between path segments
pub const PATH_SEPARATOR: char = '.';

/// Error type for key path parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    /// The segment before the first `.` is empty
    #[error("empty root segment in key '{0}'")]
    EmptyRoot(String),
}

/// A segment in a key path
///
/// # Examples
///
/// ```
/// use keystash_core::path::PathSegment;
///
/// assert_eq!(PathSegment::parse("0"), PathSegment::Index(0));
/// assert_eq!(PathSegment::parse("city"), PathSegment::Field("city".to_string()));
/// assert_eq!(PathSegment::parse("1a"), PathSegment::Field("1a".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field by name
    Field(String),
    /// Array element by position
    Index(usize),
}

impl PathSegment {
    /// Classify one raw segment
    ///
    /// A segment is an index if and only if it is non-empty and every
    /// character is an ASCII digit. Digit runs too large for `usize`
    /// saturate, which no array can reach.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            PathSegment::Index(raw.parse().unwrap_or(usize::MAX))
        } else {
            PathSegment::Field(raw.to_string())
        }
    }

    /// Key used when this segment is looked up on an object
    ///
    /// Indices use their canonical decimal form, so `007` looks up `"7"`.
    pub fn object_key(&self) -> std::borrow::Cow<'_, str> {
        match self {
            PathSegment::Field(name) => std::borrow::Cow::Borrowed(name),
            PathSegment::Index(i) => std::borrow::Cow::Owned(i.to_string()),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// A dotted key: store key plus traversal segments
///
/// # Examples
///
/// ```
/// use keystash_core::path::{KeyPath, PathSegment};
///
/// let path: KeyPath = "user.addresses.0.city".parse().unwrap();
/// assert_eq!(path.root(), "user");
/// assert_eq!(
///     path.segments(),
///     &[
///         PathSegment::Field("addresses".to_string()),
///         PathSegment::Index(0),
///         PathSegment::Field("city".to_string()),
///     ]
/// );
///
/// assert!("....".parse::<KeyPath>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    root: String,
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// Store key the value lives under
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Segments walked inside the root value
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// True if there is anything to walk below the root
    pub fn is_nested(&self) -> bool {
        !self.segments.is_empty()
    }
}

impl FromStr for KeyPath {
    type Err = PathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(PATH_SEPARATOR);
        let root = match parts.next() {
            Some(root) if !root.is_empty() => root,
            _ => return Err(PathParseError::EmptyRoot(s.to_string())),
        };
        Ok(KeyPath {
            root: root.to_string(),
            segments: parts.map(PathSegment::parse).collect(),
        })
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            write!(f, "{}{}", PATH_SEPARATOR, segment)?;
        }
        Ok(())
    }
}

// =============================================================================
// Traversal
// =============================================================================

/// What counts as a resolved member during traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceCheck {
    /// A member is present if it exists (field defined, index in bounds)
    #[default]
    Defined,
    /// A member is present only if it exists and is truthy; `0`, `false`,
    /// `""` and `null` collapse to absent
    Truthy,
}

impl PresenceCheck {
    /// Does `member` count as found
    pub fn accepts(self, member: &Value) -> bool {
        match self {
            PresenceCheck::Defined => true,
            PresenceCheck::Truthy => member.is_truthy(),
        }
    }
}

/// Move the value at `segments` out of `value`
///
/// Fields resolve on objects, indices resolve on arrays (by position) and
/// on objects (by [`PathSegment::object_key`]). Anything else is missing.
/// The first missing or rejected member stops the walk with `None`.
///
/// An empty segment list returns `value` itself.
pub fn take_at_path(
    value: Value,
    segments: &[PathSegment],
    presence: PresenceCheck,
) -> Option<Value> {
    let mut current = value;
    for segment in segments {
        let member = match (segment, current) {
            (PathSegment::Index(i), Value::Array(mut arr)) => {
                if *i < arr.len() {
                    Some(arr.swap_remove(*i))
                } else {
                    None
                }
            }
            (_, Value::Object(mut obj)) => obj.remove(segment.object_key().as_ref()),
            _ => None,
        }?;
        if !presence.accepts(&member) {
            return None;
        }
        current = member;
    }
    Some(current)
}
