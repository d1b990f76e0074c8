//! Recency-ordered doubly linked list threaded through arena entries.
//!
//! ```text
//!   head (most recent)                               tail (next victim)
//!     [id_4] <──> [id_1] <──> [id_3] <──> [id_2]
//! ```
//!
//! The queue owns only `head`, `tail` and a length; `prev`/`next` live on the
//! entries themselves (see [`Linked`]), so an entry belongs to the hash index
//! and the queue at the same time without being copied.

use crate::slot_arena::{SlotArena, SlotId};

/// An arena entry that can sit in the eviction queue.
pub trait Linked {
    /// Neighbour towards the head (more recently used).
    fn prev(&self) -> Option<SlotId>;
    /// Neighbour towards the tail (less recently used).
    fn next(&self) -> Option<SlotId>;
    fn set_prev(&mut self, prev: Option<SlotId>);
    fn set_next(&mut self, next: Option<SlotId>);
}

/// Head, tail and length of a recency list whose links live on the entries.
#[derive(Debug, Default)]
pub struct EvictionQueue {
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl EvictionQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently used slot.
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    /// Returns the least recently used slot, the next victim.
    pub fn tail(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns the number of linked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no entry is linked.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Splice a detached entry in before the current head
    fn push_front<T: Linked>(&mut self, arena: &mut SlotArena<T>, id: SlotId) {
        let old_head = self.head;
        let Some(entry) = arena.get_mut(id) else {
            return;
        };
        entry.set_prev(None);
        entry.set_next(old_head);

        match old_head.and_then(|h| arena.get_mut(h)) {
            Some(head) => head.set_prev(Some(id)),
            // Empty queue
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
    }

    /// Unlinks `id` from the queue and nulls its own links.
    ///
    /// Returns `false` without touching anything when the entry is not
    /// currently linked.
    pub fn detach<T: Linked>(&mut self, arena: &mut SlotArena<T>, id: SlotId) -> bool {
        let Some(entry) = arena.get(id) else {
            return false;
        };
        let (prev, next) = (entry.prev(), entry.next());
        if prev.is_none() && next.is_none() && self.head != Some(id) {
            return false;
        }

        match prev.and_then(|p| arena.get_mut(p)) {
            Some(p) => p.set_next(next),
            None => self.head = next,
        }
        match next.and_then(|n| arena.get_mut(n)) {
            Some(n) => n.set_prev(prev),
            None => self.tail = prev,
        }

        if let Some(entry) = arena.get_mut(id) {
            entry.set_prev(None);
            entry.set_next(None);
        }
        self.len -= 1;
        true
    }

    /// Promotes `id` to the head. A detached entry is simply linked in.
    pub fn move_to_head<T: Linked>(&mut self, arena: &mut SlotArena<T>, id: SlotId) {
        if self.head == Some(id) {
            return;
        }
        self.detach(arena, id);
        self.push_front(arena, id);
    }

    /// Detaches and returns the least recently used entry.
    pub fn remove_tail<T: Linked>(&mut self, arena: &mut SlotArena<T>) -> Option<SlotId> {
        let tail = self.tail?;
        self.detach(arena, tail).then_some(tail)
    }

    /// Slots from head to tail. Stops early on a broken or cyclic link.
    pub fn ids<T: Linked>(&self, arena: &SlotArena<T>) -> Vec<SlotId> {
        let mut out = Vec::with_capacity(self.len);
        let mut cur = self.head;
        while let Some(id) = cur {
            if out.len() > self.len {
                break;
            }
            out.push(id);
            cur = arena.get(id).and_then(Linked::next);
        }
        out
    }

    /// Forgets every link. Entry link fields are left to the caller.
    pub fn clear(&mut self) {
        self.head = None;
        self.tail = None;
        self.len = 0;
    }
}
