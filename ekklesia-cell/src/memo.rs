//! Per-instance memoization for cell properties.
//!
//! Every memoized property of a cell type owns one slot. A slot is filled
//! on first access and never recomputed for the lifetime of the cell.
//! Failed computations leave the slot empty.

use once_cell::unsync::OnceCell;
use serde_json::Value;

/// Lazily populated property values of one cell instance.
#[derive(Debug, Default)]
pub struct MemoSlots {
    slots: Vec<OnceCell<Value>>,
}

impl MemoSlots {
    /// Create storage for `count` properties.
    pub fn new(count: usize) -> Self {
        MemoSlots {
            slots: (0..count).map(|_| OnceCell::new()).collect(),
        }
    }

    /// Return the cached value of `slot`, computing it with `compute` first
    /// if the slot is still empty.
    pub fn get_or_try_init<E, F>(&self, slot: usize, compute: F) -> Result<Value, E>
    where
        F: FnOnce() -> Result<Value, E>,
    {
        match self.slots.get(slot) {
            Some(cell) => cell.get_or_try_init(compute).cloned(),
            // unknown slots are computed without caching
            None => compute(),
        }
    }

    pub fn is_computed(&self, slot: usize) -> bool {
        self.slots.get(slot).is_some_and(|cell| cell.get().is_some())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
