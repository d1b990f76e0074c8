//! Bucketed hash index with chained collision resolution.
//!
//! The table never stores entries itself: each bucket holds the `SlotId` of
//! the first entry in its chain, and the chain continues through a link field
//! on the entries in the shared [`SlotArena`]. The table size is fixed at
//! construction (the next power of two at or above the requested capacity,
//! bounded by `PREALLOC_LIMIT`) and is never rehashed.

use crate::slot_arena::{SlotArena, SlotId};
use crate::{Key, PREALLOC_LIMIT};

/// An arena entry that can sit in a bucket chain.
pub trait Chained {
    /// The key the entry is indexed under.
    fn key(&self) -> Key;
    /// The following entry in the same bucket.
    fn next_in_bucket(&self) -> Option<SlotId>;
    fn set_next_in_bucket(&mut self, next: Option<SlotId>);
}

/// Folds the high half-word of the key into the low bits before masking.
#[inline]
pub fn spread(key: Key) -> u64 {
    let h = key as u64;
    h ^ (h >> 16)
}

/// Fixed-size bucket table mapping keys to arena slots.
#[derive(Debug)]
pub struct ChainedIndex {
    buckets: Vec<Option<SlotId>>,
    mask: u64,
}

impl ChainedIndex {
    /// Creates a table sized for `capacity` entries.
    ///
    /// The bucket count is the next power of two at or above `capacity`,
    /// clamped to `1..=PREALLOC_LIMIT`. Beyond that limit chains simply grow
    /// longer.
    pub fn with_capacity(capacity: usize) -> Self {
        let size = capacity.clamp(1, PREALLOC_LIMIT).next_power_of_two();
        Self {
            buckets: vec![None; size],
            mask: (size - 1) as u64,
        }
    }

    /// Returns the number of buckets.
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the bucket `key` hashes to.
    #[inline]
    pub fn bucket_of(&self, key: Key) -> usize {
        (spread(key) & self.mask) as usize
    }

    /// Scans the key's chain and returns the slot holding it.
    pub fn find<T: Chained>(&self, arena: &SlotArena<T>, key: Key) -> Option<SlotId> {
        let mut cur = self.buckets[self.bucket_of(key)];
        while let Some(id) = cur {
            let entry = arena.get(id)?;
            if entry.key() == key {
                return Some(id);
            }
            cur = entry.next_in_bucket();
        }
        None
    }

    /// Appends `id` to the tail of its bucket's chain.
    ///
    /// The caller guarantees the key is not already indexed.
    pub fn insert<T: Chained>(&mut self, arena: &mut SlotArena<T>, id: SlotId) {
        let Some(entry) = arena.get_mut(id) else {
            return;
        };
        entry.set_next_in_bucket(None);
        let bucket = self.bucket_of(entry.key());

        let Some(mut last) = self.buckets[bucket] else {
            self.buckets[bucket] = Some(id);
            return;
        };
        while let Some(next) = arena.get(last).and_then(Chained::next_in_bucket) {
            last = next;
        }
        if let Some(tail) = arena.get_mut(last) {
            tail.set_next_in_bucket(Some(id));
        }
    }

    /// Unlinks the entry for `key` from its chain, keeping the order of the
    /// remaining entries. Returns the slot that was unlinked.
    pub fn remove<T: Chained>(&mut self, arena: &mut SlotArena<T>, key: Key) -> Option<SlotId> {
        let bucket = self.bucket_of(key);
        let mut prev: Option<SlotId> = None;
        let mut cur = self.buckets[bucket];

        while let Some(id) = cur {
            let entry = arena.get(id)?;
            let next = entry.next_in_bucket();
            if entry.key() == key {
                match prev {
                    None => self.buckets[bucket] = next,
                    Some(p) => {
                        if let Some(p) = arena.get_mut(p) {
                            p.set_next_in_bucket(next);
                        }
                    }
                }
                if let Some(entry) = arena.get_mut(id) {
                    entry.set_next_in_bucket(None);
                }
                return Some(id);
            }
            prev = Some(id);
            cur = next;
        }
        None
    }

    /// Slots in one bucket, chain order. Stops early on a broken link.
    pub fn chain<T: Chained>(&self, arena: &SlotArena<T>, bucket: usize) -> Vec<SlotId> {
        let mut out = Vec::new();
        let mut cur = self.buckets.get(bucket).copied().flatten();
        while let Some(id) = cur {
            if out.len() > arena.len() {
                break;
            }
            out.push(id);
            cur = arena.get(id).and_then(Chained::next_in_bucket);
        }
        out
    }

    /// Empties every bucket. Arena entries are left to the caller.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = None);
    }
}
