//! Fixed-capacity integer caches with LRU and LFU eviction.
//!
//! This crate provides two cache policies behind one [`Cache`] trait:
//!
//! 1. [`LruCache`] - evicts the least recently used entry. Lookup goes through a
//!    chained hash index, recency through an eviction queue; both are threaded
//!    through a single slot arena.
//! 2. [`LfuCache`] - evicts the least frequently used entry, breaking ties by
//!    the oldest access.
//!
//! Both caches are single-threaded. Wrap one in [`SharedCache`] to share it
//! between threads.
//!
//! # Examples
//!
//! ```rust
//! use eviction_cache::{Cache, CacheError, LruCache};
//!
//! let mut cache = LruCache::new(2).unwrap();
//! cache.set(1, 10);
//! cache.set(2, 20);
//! cache.get(1).unwrap();
//! cache.set(3, 30); // evicts 2
//!
//! assert_eq!(cache.get(2), Err(CacheError::NotFound { key: 2 }));
//! assert_eq!(cache.get(1), Ok(10));
//! ```

pub mod builder;
pub mod error;
pub mod eviction_queue;
mod ffi;
pub mod hash_index;
pub mod lfu_cache;
pub mod lru_cache;
pub mod shared_cache;
pub mod slot_arena;

pub use builder::{AnyCache, CacheBuilder, CachePolicy};
pub use error::{CacheError, InvariantError, Result};
pub use lfu_cache::LfuCache;
pub use lru_cache::LruCache;
pub use shared_cache::SharedCache;

// Upper bound on storage reserved up front; larger caches grow on demand.
pub(crate) const PREALLOC_LIMIT: usize = 1 << 16;

/// Cache key.
pub type Key = i64;
/// Cached value.
pub type Value = i64;

/// The operations every eviction policy in this crate supports.
pub trait Cache {
    /// Looks up `key` and records the access.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if the key is not resident. A miss
    /// leaves the cache untouched.
    fn get(&mut self, key: Key) -> Result<Value>;

    /// Inserts or updates `key`, evicting one victim first if the cache is
    /// full and `key` is new.
    fn set(&mut self, key: Key, value: Value);

    /// Returns whether `key` is resident without recording an access.
    fn contains(&self, key: Key) -> bool;

    /// Removes `key`, returning its value if it was resident.
    fn remove(&mut self, key: Key) -> Option<Value>;

    /// Returns the number of resident entries.
    fn len(&self) -> usize;

    /// Returns the fixed capacity.
    fn capacity(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries from the cache.
    fn clear(&mut self);
}
