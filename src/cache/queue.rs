//! Expiry Queue Module
//!
//! Min-heap of queue slots ordered by absolute expiry. Slots whose handle was
//! evicted or reclaimed may linger here; consumers check them against the
//! key index before acting.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::cache::QueueSlot;

// == Expiry Queue ==
#[derive(Debug, Default)]
pub struct ExpiryQueue {
    heap: BinaryHeap<Reverse<QueueSlot>>,
}

impl ExpiryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slot: QueueSlot) {
        self.heap.push(Reverse(slot));
    }

    /// Slot with the earliest expiry.
    pub fn peek(&self) -> Option<&QueueSlot> {
        self.heap.peek().map(|Reverse(slot)| slot)
    }

    pub fn pop(&mut self) -> Option<QueueSlot> {
        self.heap.pop().map(|Reverse(slot)| slot)
    }

    // == Remove ==
    /// Removes the slot equal to `slot`, returning whether one was found.
    ///
    /// Linear in the queue length.
    pub fn remove(&mut self, slot: &QueueSlot) -> bool {
        let before = self.heap.len();
        self.heap.retain(|Reverse(s)| s != slot);
        self.heap.len() != before
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
