//! Error types shared by every cache in this crate.

use std::fmt;

use thiserror::Error;

use crate::Key;

/// Errors surfaced by cache construction and lookup.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// A cache was requested with a capacity that cannot hold any entry.
    #[error("capacity must be positive, got {capacity}")]
    InvalidCapacity { capacity: usize },

    /// `get` was called for a key that is not resident.
    #[error("key {key} not found in cache")]
    NotFound { key: Key },
}

impl CacheError {
    /// Returns `true` for a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound { .. })
    }
}

/// A specialized `Result` type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error returned when a structural invariant of a cache is broken.
///
/// Produced by `check_invariants`; carries a description of the failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}
