use std::collections::{BTreeSet, HashMap};

use log::{debug, trace};

use crate::error::{CacheError, InvariantError, Result};
use crate::{Cache, Key, Value, PREALLOC_LIMIT};

// Position of an entry in the eviction order. Sequence numbers are unique, so
// no two live entries compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Priority {
    usage: u64,
    seq: u64,
    key: Key,
}

#[derive(Debug)]
struct LfuEntry {
    value: Value,
    usage: u64,
    seq: u64,
}

impl LfuEntry {
    fn priority(&self, key: Key) -> Priority {
        Priority {
            usage: self.usage,
            seq: self.seq,
            key,
        }
    }
}

/// A least-frequently-used cache over integer keys and values.
///
/// Entries are ordered by `(usage count, sequence number)`. A new entry starts
/// at usage 0; every later `get` or `set` on it bumps the usage and stamps a
/// fresh sequence number from a per-cache counter that never repeats. The
/// victim is the smallest entry in that order: the lowest usage, and among
/// equal usage the one touched longest ago.
///
/// Lookup is a `HashMap`; the order is a `BTreeSet`, giving O(log n) removal
/// of arbitrary entries as well as of the minimum.
///
/// # Examples
///
/// ```rust
/// use eviction_cache::{Cache, LfuCache};
///
/// let mut cache = LfuCache::new(2).unwrap();
/// cache.set(1, 1);
/// cache.set(2, 2);
/// cache.get(1).unwrap();
/// cache.set(3, 3); // 2 has the lowest usage
/// assert!(!cache.contains(2));
/// assert_eq!(cache.usage_count(1), Some(1));
/// ```
#[derive(Debug)]
pub struct LfuCache {
    cap: usize,
    entries: HashMap<Key, LfuEntry>,
    order: BTreeSet<Priority>,
    next_seq: u64,
}

impl LfuCache {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity { capacity });
        }
        debug!("lfu cache created: capacity {}", capacity);
        Ok(Self {
            cap: capacity,
            entries: HashMap::with_capacity(capacity.min(PREALLOC_LIMIT)),
            order: BTreeSet::new(),
            next_seq: 0,
        })
    }

    /// Reads a value without counting an access.
    pub fn peek(&self, key: Key) -> Option<Value> {
        self.entries.get(&key).map(|e| e.value)
    }

    /// Number of accesses recorded for `key` after its insertion.
    pub fn usage_count(&self, key: Key) -> Option<u64> {
        self.entries.get(&key).map(|e| e.usage)
    }

    /// The key that the next insertion into a full cache would evict.
    pub fn victim(&self) -> Option<Key> {
        self.order.first().map(|p| p.key)
    }

    /// Keys in eviction order, next victim first.
    pub fn keys_by_priority(&self) -> Vec<Key> {
        self.order.iter().map(|p| p.key).collect()
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    // Re-rank an existing entry after an access
    fn touch(&mut self, key: Key) -> Option<&mut LfuEntry> {
        let seq = self.next_seq();
        let entry = self.entries.get_mut(&key)?;
        self.order.remove(&entry.priority(key));
        entry.usage += 1;
        entry.seq = seq;
        self.order.insert(entry.priority(key));
        trace!("lfu touched key {} (usage {})", key, entry.usage);
        Some(entry)
    }

    fn evict(&mut self) {
        let Some(victim) = self.order.pop_first() else {
            return;
        };
        let removed = self.entries.remove(&victim.key);
        debug_assert!(removed.is_some(), "victim {} missing from map", victim.key);
        if let Some(entry) = removed {
            debug!(
                "lfu evicted key {} (value {}, usage {}, seq {})",
                victim.key, entry.value, victim.usage, victim.seq
            );
        }
    }

    /// Verifies that the map and the eviction order hold the same entries.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        if self.entries.len() > self.cap {
            return Err(InvariantError::new(format!(
                "occupancy {} exceeds capacity {}",
                self.entries.len(),
                self.cap
            )));
        }
        if self.order.len() != self.entries.len() {
            return Err(InvariantError::new(format!(
                "order holds {} entries, map holds {}",
                self.order.len(),
                self.entries.len()
            )));
        }
        for (&key, entry) in &self.entries {
            if !self.order.contains(&entry.priority(key)) {
                return Err(InvariantError::new(format!(
                    "key {} missing from eviction order",
                    key
                )));
            }
            if entry.seq >= self.next_seq {
                return Err(InvariantError::new(format!(
                    "key {} carries unissued sequence number {}",
                    key, entry.seq
                )));
            }
        }
        Ok(())
    }
}

impl Cache for LfuCache {
    fn get(&mut self, key: Key) -> Result<Value> {
        if !self.entries.contains_key(&key) {
            return Err(CacheError::NotFound { key });
        }
        self.touch(key)
            .map(|e| e.value)
            .ok_or(CacheError::NotFound { key })
    }

    fn set(&mut self, key: Key, value: Value) {
        if self.entries.contains_key(&key) {
            if let Some(entry) = self.touch(key) {
                entry.value = value;
            }
            return;
        }

        if self.entries.len() >= self.cap {
            self.evict();
        }

        let seq = self.next_seq();
        let entry = LfuEntry {
            value,
            usage: 0,
            seq,
        };
        self.order.insert(entry.priority(key));
        self.entries.insert(key, entry);
        trace!("lfu inserted key {} (seq {})", key, seq);
    }

    fn contains(&self, key: Key) -> bool {
        self.entries.contains_key(&key)
    }

    fn remove(&mut self, key: Key) -> Option<Value> {
        let entry = self.entries.remove(&key)?;
        self.order.remove(&entry.priority(key));
        Some(entry.value)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.cap
    }

    // The sequence counter keeps running across clears.
    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
