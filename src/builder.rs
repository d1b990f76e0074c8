//! Construction-time configuration for both eviction policies.
//!
//! ## Example
//!
//! ```rust
//! use eviction_cache::{Cache, CacheBuilder, CachePolicy};
//!
//! let mut cache = CacheBuilder::new(100).build(CachePolicy::Lfu).unwrap();
//! cache.set(1, 42);
//! assert_eq!(cache.get(1), Ok(42));
//! assert_eq!(cache.policy(), CachePolicy::Lfu);
//! ```

use crate::error::Result;
use crate::lfu_cache::LfuCache;
use crate::lru_cache::LruCache;
use crate::shared_cache::SharedCache;
use crate::{Cache, Key, Value};

/// Available eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction, oldest access first among ties.
    Lfu,
}

/// A cache of either policy behind one concrete type.
#[derive(Debug)]
pub enum AnyCache {
    Lru(LruCache),
    Lfu(LfuCache),
}

impl AnyCache {
    /// Returns the policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match self {
            AnyCache::Lru(_) => CachePolicy::Lru,
            AnyCache::Lfu(_) => CachePolicy::Lfu,
        }
    }
}

impl Cache for AnyCache {
    fn get(&mut self, key: Key) -> Result<Value> {
        match self {
            AnyCache::Lru(lru) => lru.get(key),
            AnyCache::Lfu(lfu) => lfu.get(key),
        }
    }

    fn set(&mut self, key: Key, value: Value) {
        match self {
            AnyCache::Lru(lru) => lru.set(key, value),
            AnyCache::Lfu(lfu) => lfu.set(key, value),
        }
    }

    fn contains(&self, key: Key) -> bool {
        match self {
            AnyCache::Lru(lru) => lru.contains(key),
            AnyCache::Lfu(lfu) => lfu.contains(key),
        }
    }

    fn remove(&mut self, key: Key) -> Option<Value> {
        match self {
            AnyCache::Lru(lru) => lru.remove(key),
            AnyCache::Lfu(lfu) => lfu.remove(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            AnyCache::Lru(lru) => lru.len(),
            AnyCache::Lfu(lfu) => lfu.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            AnyCache::Lru(lru) => lru.capacity(),
            AnyCache::Lfu(lfu) => lfu.capacity(),
        }
    }

    fn clear(&mut self) {
        match self {
            AnyCache::Lru(lru) => lru.clear(),
            AnyCache::Lfu(lfu) => lfu.clear(),
        }
    }
}

/// Builder for caches of a fixed capacity.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Starts a builder for caches holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Builds a single-threaded cache with the given policy.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity)
    /// if the capacity is zero. Any positive capacity is accepted.
    pub fn build(self, policy: CachePolicy) -> Result<AnyCache> {
        Ok(match policy {
            CachePolicy::Lru => AnyCache::Lru(LruCache::new(self.capacity)?),
            CachePolicy::Lfu => AnyCache::Lfu(LfuCache::new(self.capacity)?),
        })
    }

    /// Builds a mutex-guarded cache that can be shared between threads.
    pub fn build_shared(self, policy: CachePolicy) -> Result<SharedCache<AnyCache>> {
        self.build(policy).map(SharedCache::new)
    }
}
