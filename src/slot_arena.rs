//! Stable-index storage for cache entries.
//!
//! Entries live in a `Vec<Option<T>>`; freed slots are recycled through a
//! free list so a `SlotId` stays valid until its entry is removed. The hash
//! index and the eviction queue both refer to entries by `SlotId` instead of
//! holding references.

/// Stable handle to an occupied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Returns the raw slot position.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Vector of optional slots with a free list of vacated positions.
#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    /// Creates an empty arena with room for `capacity` entries before it
    /// reallocates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores `value`, reusing a freed slot when one is available.
    ///
    /// # Returns
    ///
    /// The handle of the slot now holding `value`.
    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(value);
            idx
        } else {
            self.slots.push(Some(value));
            self.slots.len() - 1
        };
        self.len += 1;
        SlotId(idx)
    }

    /// Vacates a slot and returns its value.
    ///
    /// # Returns
    ///
    /// * `Some(T)` if the slot was occupied
    /// * `None` if it was already free or out of range
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    /// Borrows the value in an occupied slot.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    /// Mutably borrows the value in an occupied slot.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every value. Outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    /// Iterates over occupied slots in position order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}
