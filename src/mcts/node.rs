//! Search tree node.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability. A node is one partial tour: the path of parents back
//! to the root spells out every square visited so far.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Position;

/// Index into the TourTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A partial tour ending at `position`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TourNode {
    /// Parent node (NONE for root). Never an owner.
    pub parent: NodeId,

    /// Square this partial tour ends on.
    pub position: Position,

    /// Squares visited so far including this one (root = 1).
    pub depth: u16,

    /// Total visits to this node.
    pub visits: u32,

    /// Sum of every reward backpropagated through this node.
    pub total_value: f64,

    /// Materialized children. A knight has at most 8 successors, so this
    /// never spills to the heap.
    pub children: SmallVec<[NodeId; 8]>,

    /// Number of valid moves from here, cached on first expansion.
    pub legal_moves: Option<u8>,
}

impl TourNode {
    /// Create a new node.
    pub fn new(parent: NodeId, position: Position, depth: u16) -> Self {
        Self {
            parent,
            position,
            depth,
            visits: 0,
            total_value: 0.0,
            children: SmallVec::new(),
            legal_moves: None,
        }
    }

    /// Create a root node.
    pub fn root(position: Position) -> Self {
        Self::new(NodeId::NONE, position, 1)
    }

    /// Check if this node is the root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check if the node has no materialized children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Mean backpropagated value, 0 when unvisited.
    #[must_use]
    pub fn mean_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / f64::from(self.visits)
        }
    }
}
