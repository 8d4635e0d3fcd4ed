//! Best-first frontier with deterministic tie-breaking and lazy deletion.
//!
//! Entries are `(FrontierKey, NodeId)` in a min-heap. Improving a node's
//! f-score pushes a fresh entry instead of re-keying the old one; the engine
//! discards popped entries whose sequence no longer matches the node's
//! [`NodeStatus::Open`](crate::node::NodeStatus::Open) sequence.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::node::{FrontierKey, NodeId};

/// `BinaryHeap` is a max-heap, so entries are wrapped in `Reverse` to pop
/// the lowest key first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    key: FrontierKey,
    node: NodeId,
}

/// Best-first frontier manager.
#[derive(Debug, Default)]
pub struct BestFirstFrontier {
    heap: BinaryHeap<Reverse<FrontierEntry>>,
    next_seq: u64,
    high_water: usize,
}

impl BestFirstFrontier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `node` with score `f`. Returns the sequence number assigned to
    /// this entry.
    pub fn push(&mut self, node: NodeId, f: f64) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(FrontierEntry {
            key: FrontierKey { f, seq },
            node,
        }));
        self.high_water = self.high_water.max(self.heap.len());
        seq
    }

    /// Pop the entry with the lowest `(f, seq)`.
    #[must_use]
    pub fn pop(&mut self) -> Option<(NodeId, FrontierKey)> {
        self.heap.pop().map(|Reverse(e)| (e.node, e.key))
    }

    /// Entries currently held, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest number of entries held at once.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}
