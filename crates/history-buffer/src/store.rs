//! Ring Store
//!
//! Unsynchronized backing store. Callers must hold the buffer lock for
//! every access.

use crate::error::BufferError;
use crate::rollover::{add_rollover, decrement, increment, sub_rollover};

/// Fixed-capacity slots plus the counters that give them meaning
#[derive(Debug, Clone)]
pub(crate) struct Store<T> {
    /// Slots, filled by push on the first pass and overwritten afterwards
    pub(crate) storage: Vec<T>,
    /// Number of slots
    pub(crate) capacity: usize,
    /// Slot the next insertion will occupy
    pub(crate) insert_pos: usize,
    /// Number of live elements
    pub(crate) count: usize,
    /// Total insertions, wrapping at `u64::MAX`
    pub(crate) base_id: u64,
}

impl<T> Store<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            insert_pos: 0,
            count: 0,
            base_id: 0,
        }
    }

    /// Largest valid slot index, the rollover limit for slot arithmetic
    #[inline]
    pub(crate) fn last_slot(&self) -> usize {
        self.capacity - 1
    }

    /// Slot holding the most recently inserted element
    #[inline]
    pub(crate) fn newest_slot(&self) -> usize {
        let mut slot = self.insert_pos;
        decrement(&mut slot, self.last_slot());
        slot
    }

    pub(crate) fn insert(&mut self, value: T) {
        if self.storage.len() <= self.insert_pos {
            self.storage.push(value);
        } else {
            self.storage[self.insert_pos] = value;
        }

        if self.count < self.capacity {
            self.count += 1;
        }

        let last_slot = self.last_slot();
        increment(&mut self.insert_pos, last_slot);
        increment(&mut self.base_id, u64::MAX);
    }

    /// Element `id` positions after the oldest live one
    pub(crate) fn forward(&self, id: usize) -> Result<&T, BufferError> {
        if id >= self.count {
            return Err(BufferError::OutOfBounds {
                index: id,
                len: self.count,
            });
        }

        let oldest = sub_rollover(self.newest_slot(), self.count - 1, self.last_slot());
        Ok(&self.storage[add_rollover(oldest, id, self.last_slot())])
    }

    /// Element `pos` positions before the newest live one
    pub(crate) fn backward(&self, pos: usize) -> Result<&T, BufferError> {
        if pos >= self.count {
            return Err(BufferError::OutOfBounds {
                index: pos,
                len: self.count,
            });
        }

        Ok(&self.storage[sub_rollover(self.newest_slot(), pos, self.last_slot())])
    }

    /// Forget all live elements, keeping slots and `base_id`
    pub(crate) fn clear(&mut self) {
        self.count = 0;
    }
}
