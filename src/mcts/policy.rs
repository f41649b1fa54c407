//! Child selection during tree descent.

use super::node::NodeId;
use super::tree::TourTree;

/// Policy for choosing which child of a fully expanded node to descend into.
pub trait SelectionPolicy {
    /// Pick a child of `parent`, or `None` if no child can be chosen.
    fn select(&self, tree: &TourTree, parent: NodeId, exploration_constant: f64) -> Option<NodeId>;
}

/// UCT (UCB1 applied to trees).
///
/// Formula: Q(c) + C * sqrt(ln(N + 1) / n(c)), where an unvisited child
/// scores +inf. The first child with the strictly greatest score wins, so
/// ties keep insertion order.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uct;

impl Uct {
    /// Score a single child given its parent's visit count.
    #[must_use]
    pub fn score(parent_visits: u32, child_visits: u32, child_value: f64, c: f64) -> f64 {
        if child_visits == 0 {
            return f64::INFINITY;
        }
        let n = f64::from(child_visits);
        let exploitation = child_value / n;
        let exploration = c * ((f64::from(parent_visits) + 1.0).ln() / n).sqrt();
        exploitation + exploration
    }
}

impl SelectionPolicy for Uct {
    fn select(&self, tree: &TourTree, parent: NodeId, exploration_constant: f64) -> Option<NodeId> {
        let node = tree.get(parent);
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;

        for &child_id in &node.children {
            let child = tree.get(child_id);
            let score = Self::score(node.visits, child.visits, child.total_value, exploration_constant);
            // NaN never compares greater, so a poisoned child is skipped.
            if score > best_score {
                best_score = score;
                best = Some(child_id);
            }
        }

        best
    }
}
