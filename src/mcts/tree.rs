//! Arena-based search tree.
//!
//! Uses a flat `Vec<TourNode>` with index-based references for efficiency,
//! cache-friendliness, and serializability. Children are owned through the
//! index lists in each node; parents are plain back-references.

use std::collections::TryReserveError;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::node::{NodeId, TourNode};
use crate::core::{Board, Position};

/// Reasons the arena could not grow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("node limit of {limit} reached")]
    CapacityExceeded { limit: usize },

    #[error("failed to grow node arena: {0}")]
    Reserve(#[from] TryReserveError),
}

/// Arena-based search tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// This avoids reference counting overhead and enables serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TourTree {
    /// All nodes in the tree.
    nodes: Vec<TourNode>,

    /// The root node ID (always 0).
    root: NodeId,

    /// Maximum number of nodes the arena may hold.
    max_nodes: usize,
}

impl TourTree {
    /// Create a tree with a root node and no node limit.
    pub fn new(root: Position) -> Self {
        Self::with_limit(root, usize::MAX)
    }

    /// Create a tree that refuses to grow beyond `max_nodes` nodes.
    pub fn with_limit(root: Position, max_nodes: usize) -> Self {
        let mut nodes = Vec::with_capacity(max_nodes.clamp(1, 1024));
        nodes.push(TourNode::root(root));
        Self {
            nodes,
            root: NodeId::new(0),
            max_nodes,
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &TourNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut TourNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &TourNode {
        self.get(self.root)
    }

    /// Allocate a new node, returning its ID.
    ///
    /// Fails instead of aborting when the node limit is hit or the
    /// allocator cannot provide more room.
    pub fn alloc(&mut self, node: TourNode) -> Result<NodeId, TreeError> {
        if self.nodes.len() >= self.max_nodes {
            return Err(TreeError::CapacityExceeded {
                limit: self.max_nodes,
            });
        }
        let id = u32::try_from(self.nodes.len())
            .ok()
            .filter(|&raw| raw != NodeId::NONE.raw())
            .ok_or(TreeError::CapacityExceeded {
                limit: NodeId::NONE.raw() as usize,
            })?;
        self.nodes.try_reserve(1)?;
        self.nodes.push(node);
        Ok(NodeId::new(id))
    }

    /// Allocate `node` and link it under its parent.
    pub fn attach(&mut self, node: TourNode) -> Result<NodeId, TreeError> {
        let parent = node.parent;
        let id = self.alloc(node)?;
        self.get_mut(parent).children.push(id);
        Ok(id)
    }

    /// Node IDs from `id` up to the root, inclusive.
    pub fn ancestor_ids(&self, id: NodeId) -> impl Iterator<Item = NodeId> + Clone + '_ {
        std::iter::successors(Some(id).filter(|i| !i.is_none()), move |&i| {
            let parent = self.get(i).parent;
            (!parent.is_none()).then_some(parent)
        })
    }

    /// Positions on the partial tour ending at `id`, newest first.
    pub fn ancestry(&self, id: NodeId) -> impl Iterator<Item = Position> + Clone + '_ {
        self.ancestor_ids(id).map(move |i| self.get(i).position)
    }

    /// Node IDs from the root down to `id`.
    #[must_use]
    pub fn path_ids(&self, id: NodeId) -> Vec<NodeId> {
        let mut path: Vec<NodeId> = self.ancestor_ids(id).collect();
        path.reverse();
        path
    }

    /// Build the detached children of `id`: one per valid knight move, with
    /// depth + 1 and `id` as parent. The tree itself is left untouched.
    #[must_use]
    pub fn expand(&self, board: &Board, id: NodeId) -> SmallVec<[TourNode; 8]> {
        let depth = self.get(id).depth + 1;
        board
            .successors(self.ancestry(id))
            .into_iter()
            .map(|position| TourNode::new(id, position, depth))
            .collect()
    }

    /// Number of valid moves from `id` given its ancestry.
    #[must_use]
    pub fn legal_move_count(&self, board: &Board, id: NodeId) -> usize {
        match self.get(id).legal_moves {
            Some(count) => usize::from(count),
            None => board.successors(self.ancestry(id)).len(),
        }
    }

    /// Every valid move from `id` has a materialized child.
    #[must_use]
    pub fn is_fully_expanded(&self, board: &Board, id: NodeId) -> bool {
        self.get(id).children.len() == self.legal_move_count(board, id)
    }

    /// The partial tour at `id` covers the whole board.
    #[must_use]
    pub fn is_goal(&self, board: &Board, id: NodeId) -> bool {
        board.is_goal(self.get(id).depth)
    }

    /// Add one visit and `reward` to every node from `id` up to the root.
    pub fn backpropagate(&mut self, id: NodeId, reward: f64) {
        let mut current = id;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.visits += 1;
            node.total_value += reward;
            current = node.parent;
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node limit this tree was created with.
    #[must_use]
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TourNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self, board: &Board) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let terminal_count = self.nodes.iter().filter(|n| board.is_goal(n.depth)).count();
        let leaf_count = self.nodes.iter().filter(|n| n.is_leaf()).count();
        let total_children: usize = self.nodes.iter().map(|n| n.children.len()).sum();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            terminal_count,
            leaf_count,
            total_children,
        }
    }

    /// Arena memory usage.
    #[must_use]
    pub fn memory_stats(&self) -> MemoryStats {
        let node_size = std::mem::size_of::<TourNode>();
        let capacity_bytes = self.nodes.capacity() * node_size;
        let used_bytes = self.nodes.len() * node_size;

        MemoryStats {
            node_count: self.nodes.len(),
            capacity_bytes,
            used_bytes,
            free_bytes: capacity_bytes - used_bytes,
        }
    }
}

/// Statistics about the search tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Number of complete tours in the tree.
    pub terminal_count: usize,

    /// Nodes with no materialized children.
    pub leaf_count: usize,

    /// Sum of child list lengths.
    pub total_children: usize,
}

impl TreeStats {
    /// Average number of children per expanded node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let expanded = self.node_count - self.leaf_count;
        if expanded == 0 {
            0.0
        } else {
            self.total_children as f64 / expanded as f64
        }
    }
}

/// Heap usage of the node arena.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Nodes currently allocated.
    pub node_count: usize,

    /// Bytes reserved by the arena.
    pub capacity_bytes: usize,

    /// Bytes occupied by live nodes.
    pub used_bytes: usize,

    /// Reserved but unused bytes.
    pub free_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board5() -> Board {
        Board::new(5).unwrap()
    }

    #[test]
    fn test_tree_new() {
        let tree = TourTree::new(Position::ORIGIN);

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::new(0));
        assert_eq!(tree.root_node().depth, 1);
        assert!(tree.root_node().is_root());
    }

    #[test]
    fn test_tree_attach() {
        let mut tree = TourTree::new(Position::ORIGIN);
        let root = tree.root();

        let child = tree.attach(TourNode::new(root, Position::new(2, 1), 2)).unwrap();

        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(root).children.as_slice(), &[child]);
        assert_eq!(tree.get(child).parent, root);
    }

    #[test]
    fn test_ancestry_walks_to_root() {
        let mut tree = TourTree::new(Position::ORIGIN);
        let a = tree.attach(TourNode::new(tree.root(), Position::new(2, 1), 2)).unwrap();
        let b = tree.attach(TourNode::new(a, Position::new(4, 2), 3)).unwrap();

        let chain: Vec<_> = tree.ancestry(b).collect();
        assert_eq!(chain, vec![Position::new(4, 2), Position::new(2, 1), Position::ORIGIN]);

        assert_eq!(tree.path_ids(b), vec![tree.root(), a, b]);
    }

    #[test]
    fn test_expand_does_not_attach() {
        let tree = TourTree::new(Position::ORIGIN);
        let board = board5();

        let children = tree.expand(&board, tree.root());

        assert_eq!(children.len(), 2);
        assert!(children.iter().all(|c| c.depth == 2 && c.parent == tree.root()));
        assert!(tree.root_node().children.is_empty());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_expand_respects_ancestry() {
        let mut tree = TourTree::new(Position::ORIGIN);
        let board = board5();
        let a = tree.attach(TourNode::new(tree.root(), Position::new(2, 1), 2)).unwrap();

        let children = tree.expand(&board, a);

        assert!(children.iter().all(|c| c.position != Position::ORIGIN));
    }

    #[test]
    fn test_fully_expanded() {
        let mut tree = TourTree::new(Position::ORIGIN);
        let board = board5();
        let root = tree.root();

        assert!(!tree.is_fully_expanded(&board, root));

        for child in tree.expand(&board, root) {
            tree.attach(child).unwrap();
        }

        assert!(tree.is_fully_expanded(&board, root));
        assert_eq!(tree.legal_move_count(&board, root), 2);
    }

    #[test]
    fn test_backpropagate_updates_only_path() {
        let mut tree = TourTree::new(Position::ORIGIN);
        let root = tree.root();
        let a = tree.attach(TourNode::new(root, Position::new(2, 1), 2)).unwrap();
        let b = tree.attach(TourNode::new(root, Position::new(1, 2), 2)).unwrap();
        let c = tree.attach(TourNode::new(a, Position::new(4, 2), 3)).unwrap();

        tree.backpropagate(c, 0.5);

        for id in [root, a, c] {
            assert_eq!(tree.get(id).visits, 1);
            assert_eq!(tree.get(id).total_value, 0.5);
        }
        assert_eq!(tree.get(b).visits, 0);
        assert_eq!(tree.get(b).total_value, 0.0);
    }

    #[test]
    fn test_node_limit() {
        let mut tree = TourTree::with_limit(Position::ORIGIN, 2);
        let root = tree.root();

        tree.attach(TourNode::new(root, Position::new(2, 1), 2)).unwrap();
        let err = tree.attach(TourNode::new(root, Position::new(1, 2), 2)).unwrap_err();

        assert_eq!(err, TreeError::CapacityExceeded { limit: 2 });
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root_node().children.len(), 1);
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = TourTree::new(Position::ORIGIN);
        let board = Board::new(1).unwrap();
        let stats = tree.stats(&board);

        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.leaf_count, 1);
        assert_eq!(stats.branching_factor(), 0.0);

        let root = tree.root();
        tree.attach(TourNode::new(root, Position::new(2, 1), 2)).unwrap();
        tree.attach(TourNode::new(root, Position::new(1, 2), 2)).unwrap();

        let stats = tree.stats(&board5());
        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.terminal_count, 0);
        assert_eq!(stats.leaf_count, 2);
        assert_eq!(stats.branching_factor(), 2.0);
    }

    #[test]
    fn test_memory_stats() {
        let tree = TourTree::new(Position::ORIGIN);
        let stats = tree.memory_stats();

        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.used_bytes, std::mem::size_of::<TourNode>());
        assert_eq!(stats.capacity_bytes, stats.used_bytes + stats.free_bytes);
    }

    #[test]
    fn test_tree_iter() {
        let mut tree = TourTree::new(Position::ORIGIN);
        tree.attach(TourNode::new(NodeId::new(0), Position::new(2, 1), 2)).unwrap();

        let nodes: Vec<_> = tree.iter().collect();

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].0, NodeId::new(0));
        assert_eq!(nodes[1].0, NodeId::new(1));
    }

    #[test]
    fn test_tree_serialization() {
        let mut tree = TourTree::new(Position::ORIGIN);
        tree.backpropagate(tree.root(), 0.2);
        tree.attach(TourNode::new(NodeId::new(0), Position::new(2, 1), 2)).unwrap();

        let json = serde_json::to_string(&tree).unwrap();
        let deserialized: TourTree = serde_json::from_str(&json).unwrap();

        assert_eq!(tree.len(), deserialized.len());
        assert_eq!(tree.root_node().visits, deserialized.root_node().visits);
        assert_eq!(tree.max_nodes(), deserialized.max_nodes());
    }
}
