use log::{debug, trace};

use crate::error::{CacheError, InvariantError, Result};
use crate::eviction_queue::{EvictionQueue, Linked};
use crate::hash_index::{Chained, ChainedIndex};
use crate::slot_arena::{SlotArena, SlotId};
use crate::{Cache, Key, Value, PREALLOC_LIMIT};

// Arena entry: a member of one bucket chain and of the eviction queue at once
#[derive(Debug)]
struct LruEntry {
    key: Key,
    value: Value,
    prev: Option<SlotId>,
    next: Option<SlotId>,
    next_in_bucket: Option<SlotId>,
}

impl LruEntry {
    fn new(key: Key, value: Value) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
            next_in_bucket: None,
        }
    }
}

impl Chained for LruEntry {
    fn key(&self) -> Key {
        self.key
    }

    fn next_in_bucket(&self) -> Option<SlotId> {
        self.next_in_bucket
    }

    fn set_next_in_bucket(&mut self, next: Option<SlotId>) {
        self.next_in_bucket = next;
    }
}

impl Linked for LruEntry {
    fn prev(&self) -> Option<SlotId> {
        self.prev
    }

    fn next(&self) -> Option<SlotId> {
        self.next
    }

    fn set_prev(&mut self, prev: Option<SlotId>) {
        self.prev = prev;
    }

    fn set_next(&mut self, next: Option<SlotId>) {
        self.next = next;
    }
}

/// A least-recently-used cache over integer keys and values.
///
/// Entries are stored once in a slot arena. A fixed-size chained hash index
/// resolves keys to slots, and an eviction queue orders the same slots by
/// recency: the head is the most recently used entry, the tail is the next
/// victim. Every successful `get` or `set` promotes its entry to the head.
///
/// # Examples
///
/// ```rust
/// use eviction_cache::{Cache, LruCache};
///
/// let mut cache = LruCache::new(2).unwrap();
/// cache.set(1, 1);
/// cache.set(2, 2);
/// cache.set(3, 3);
/// assert!(!cache.contains(1));
/// assert_eq!(cache.keys_by_recency(), vec![3, 2]);
/// ```
#[derive(Debug)]
pub struct LruCache {
    cap: usize,
    arena: SlotArena<LruEntry>,
    index: ChainedIndex,
    queue: EvictionQueue,
}

impl LruCache {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity { capacity });
        }
        let index = ChainedIndex::with_capacity(capacity);
        debug!(
            "lru cache created: capacity {}, {} buckets",
            capacity,
            index.table_size()
        );
        Ok(Self {
            cap: capacity,
            arena: SlotArena::with_capacity(capacity.min(PREALLOC_LIMIT)),
            index,
            queue: EvictionQueue::new(),
        })
    }

    /// Reads a value without promoting it.
    pub fn peek(&self, key: Key) -> Option<Value> {
        let id = self.index.find(&self.arena, key)?;
        self.arena.get(id).map(|e| e.value)
    }

    /// Keys from most to least recently used. The last key is the next victim.
    pub fn keys_by_recency(&self) -> Vec<Key> {
        self.queue
            .ids(&self.arena)
            .into_iter()
            .filter_map(|id| self.arena.get(id).map(|e| e.key))
            .collect()
    }

    /// Keys in each hash bucket, in chain order.
    pub fn bucket_chains(&self) -> Vec<Vec<Key>> {
        (0..self.index.table_size())
            .map(|bucket| {
                self.index
                    .chain(&self.arena, bucket)
                    .into_iter()
                    .filter_map(|id| self.arena.get(id).map(|e| e.key))
                    .collect()
            })
            .collect()
    }

    fn evict(&mut self) {
        let Some(id) = self.queue.remove_tail(&mut self.arena) else {
            return;
        };
        let Some(key) = self.arena.get(id).map(|e| e.key) else {
            return;
        };
        let unlinked = self.index.remove(&mut self.arena, key);
        debug_assert_eq!(unlinked, Some(id), "victim {} indexed to another slot", key);
        if let Some(victim) = self.arena.remove(id) {
            debug!("lru evicted key {} (value {})", victim.key, victim.value);
        }
    }

    /// Verifies that the hash index and the eviction queue hold exactly the
    /// same entries, once each, with consistent links.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantError> {
        let len = self.arena.len();
        if len > self.cap {
            return Err(InvariantError::new(format!(
                "occupancy {} exceeds capacity {}",
                len, self.cap
            )));
        }
        if self.queue.len() != len {
            return Err(InvariantError::new(format!(
                "queue length {} != occupancy {}",
                self.queue.len(),
                len
            )));
        }

        let ids = self.queue.ids(&self.arena);
        if ids.len() != len {
            return Err(InvariantError::new(format!(
                "queue walk reached {} entries, expected {}",
                ids.len(),
                len
            )));
        }
        if self.queue.tail() != ids.last().copied() {
            return Err(InvariantError::new("tail is not the last queue entry"));
        }
        let mut prev = None;
        for &id in &ids {
            let entry = self
                .arena
                .get(id)
                .ok_or_else(|| InvariantError::new("queue links a freed slot"))?;
            if entry.prev != prev {
                return Err(InvariantError::new(format!(
                    "broken back link at key {}",
                    entry.key
                )));
            }
            if self.index.find(&self.arena, entry.key) != Some(id) {
                return Err(InvariantError::new(format!(
                    "key {} is queued but not indexed to its slot",
                    entry.key
                )));
            }
            prev = Some(id);
        }

        let mut indexed = 0;
        for bucket in 0..self.index.table_size() {
            for id in self.index.chain(&self.arena, bucket) {
                let entry = self
                    .arena
                    .get(id)
                    .ok_or_else(|| InvariantError::new("bucket links a freed slot"))?;
                if self.index.bucket_of(entry.key) != bucket {
                    return Err(InvariantError::new(format!(
                        "key {} chained in bucket {}",
                        entry.key, bucket
                    )));
                }
                indexed += 1;
            }
        }
        if indexed != len {
            return Err(InvariantError::new(format!(
                "index holds {} entries, expected {}",
                indexed, len
            )));
        }

        // Orphaned slots
        for (id, entry) in self.arena.iter() {
            if self.index.find(&self.arena, entry.key) != Some(id) {
                return Err(InvariantError::new(format!(
                    "slot {} for key {} is unreachable from the index",
                    id.index(),
                    entry.key
                )));
            }
        }
        Ok(())
    }
}

impl Cache for LruCache {
    fn get(&mut self, key: Key) -> Result<Value> {
        let id = self
            .index
            .find(&self.arena, key)
            .ok_or(CacheError::NotFound { key })?;
        self.queue.move_to_head(&mut self.arena, id);
        trace!("lru promoted key {}", key);
        self.arena
            .get(id)
            .map(|e| e.value)
            .ok_or(CacheError::NotFound { key })
    }

    fn set(&mut self, key: Key, value: Value) {
        // 1. Update in place
        if let Some(id) = self.index.find(&self.arena, key) {
            if let Some(entry) = self.arena.get_mut(id) {
                entry.value = value;
            }
            self.queue.move_to_head(&mut self.arena, id);
            trace!("lru updated key {}", key);
            return;
        }

        // 2. Make room
        if self.arena.len() >= self.cap {
            self.evict();
        }

        // 3. Link the new entry into both structures
        let id = self.arena.insert(LruEntry::new(key, value));
        self.index.insert(&mut self.arena, id);
        self.queue.move_to_head(&mut self.arena, id);
        trace!("lru inserted key {}", key);
    }

    fn contains(&self, key: Key) -> bool {
        self.index.find(&self.arena, key).is_some()
    }

    fn remove(&mut self, key: Key) -> Option<Value> {
        let id = self.index.remove(&mut self.arena, key)?;
        self.queue.detach(&mut self.arena, id);
        self.arena.remove(id).map(|e| e.value)
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn capacity(&self) -> usize {
        self.cap
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.queue.clear();
    }
}
