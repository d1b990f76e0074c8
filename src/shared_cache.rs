use parking_lot::Mutex;

use crate::error::Result;
use crate::{Cache, Key, Value};

/// A thread-safe handle around any [`Cache`].
///
/// A single mutex guards every operation, so each call observes and leaves
/// the cache exactly as the single-threaded cache would. Share it between
/// threads with `Arc`.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use eviction_cache::{LruCache, SharedCache};
///
/// let cache = Arc::new(SharedCache::new(LruCache::new(100).unwrap()));
/// cache.set(1, 10);
/// assert_eq!(cache.get(1), Ok(10));
/// ```
pub struct SharedCache<C: Cache> {
    inner: Mutex<C>,
}

impl<C: Cache> SharedCache<C> {
    /// Takes ownership of `cache` and puts it behind the lock.
    pub fn new(cache: C) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Retrieves a value and records the access.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to look up
    ///
    /// # Returns
    ///
    /// * `Ok(Value)` if the key exists
    /// * `Err(CacheError::NotFound)` if it doesn't
    pub fn get(&self, key: Key) -> Result<Value> {
        self.inner.lock().get(key)
    }

    /// Inserts or updates a key, evicting if the cache is full.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    /// * `value` - The value to insert
    pub fn set(&self, key: Key, value: Value) {
        self.inner.lock().set(key, value)
    }

    /// Returns whether `key` is resident without recording an access.
    pub fn contains(&self, key: Key) -> bool {
        self.inner.lock().contains(key)
    }

    /// Removes an entry from the cache by its key.
    ///
    /// # Returns
    ///
    /// * `Some(Value)` if the key existed (returns the removed value)
    /// * `None` if the key didn't exist
    pub fn remove(&self, key: Key) -> Option<Value> {
        self.inner.lock().remove(key)
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the fixed capacity of the wrapped cache.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Removes all entries from the cache.
    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    /// Runs `f` with the lock held, for several steps that must not
    /// interleave with other callers.
    pub fn with_inner<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut *guard)
    }

    /// Consumes the handle and returns the wrapped cache.
    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }
}
