//! Search nodes, the node arena, and the frontier ordering key.
//!
//! Nodes live in one arena, addressed by [`NodeId`], and are keyed by
//! [`EncodedState`] for duplicate detection. Each node stores a back-pointer
//! (parent id + move) instead of a full path; [`NodeArena::path_to`] walks
//! the back-pointers once, at termination.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use cubist_kernel::carrier::codec::EncodedState;
use cubist_kernel::operators::moves::Move;

/// Index of a node in its [`NodeArena`]. Assigned in discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

/// Lifecycle of a discovered state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// On the frontier. `seq` is the push sequence of its live entry;
    /// older entries for the same node are stale.
    Open { seq: u64 },
    /// Expanded at least once.
    Closed,
}

/// A discovered state and its best known path.
#[derive(Debug, Clone)]
pub struct SearchNode {
    pub state: EncodedState,
    /// Predecessor and the move taken from it (`None` for the start node).
    pub parent: Option<(NodeId, Move)>,
    /// Moves from the start along the recorded path.
    pub g: u32,
    /// Cached heuristic estimate (unweighted).
    pub h: f64,
    /// `g + λ·h`.
    pub f: f64,
    pub status: NodeStatus,
}

impl SearchNode {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == NodeStatus::Closed
    }
}

/// Owns every node discovered by one search.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
    index: HashMap<EncodedState, NodeId>,
}

impl NodeArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a newly discovered node. The caller guarantees its state is not
    /// already present.
    pub fn insert(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        debug_assert!(!self.index.contains_key(&node.state));
        self.index.insert(node.state.clone(), id);
        self.nodes.push(node);
        id
    }

    #[must_use]
    pub fn lookup(&self, state: &EncodedState) -> Option<NodeId> {
        self.index.get(state).copied()
    }

    /// Panics if `id` did not come from this arena.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Panics if `id` did not come from this arena.
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reconstruct the move sequence from the start node to `id`.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<Move> {
        let mut path = Vec::with_capacity(self.get(id).g as usize);
        let mut cursor = id;
        while let Some((parent, mv)) = self.get(cursor).parent {
            path.push(mv);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

/// The frontier ordering key: `(f, seq)`.
///
/// Lower `f` first (IEEE total order), then lower push sequence, so entries
/// with equal `f` pop in the order they were pushed.
#[derive(Debug, Clone, Copy)]
pub struct FrontierKey {
    pub f: f64,
    pub seq: u64,
}

impl PartialEq for FrontierKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then(self.seq.cmp(&other.seq))
    }
}
