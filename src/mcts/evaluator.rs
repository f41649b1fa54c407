//! Leaf evaluation.
//!
//! The evaluator replaces the random rollout of classic MCTS: it scores a
//! partial tour directly. A trained model would plug in here. The baseline
//! scores proportional progress.

use crate::core::Board;

use super::node::TourNode;

/// Scores how promising a partial tour is, conventionally in `[0, 1]`.
///
/// Any `Fn(&TourNode, &Board) -> f64` is an evaluator:
///
/// ```
/// use knight_tour::core::{Board, Position};
/// use knight_tour::mcts::{Evaluator, TourNode};
///
/// let flat = |_: &TourNode, _: &Board| 0.5;
/// let board = Board::new(5).unwrap();
/// assert_eq!(flat.evaluate(&TourNode::root(Position::ORIGIN), &board), 0.5);
/// ```
pub trait Evaluator {
    /// Score `node` on `board`.
    fn evaluate(&self, node: &TourNode, board: &Board) -> f64;
}

impl<F> Evaluator for F
where
    F: Fn(&TourNode, &Board) -> f64,
{
    fn evaluate(&self, node: &TourNode, board: &Board) -> f64 {
        self(node, board)
    }
}

/// Baseline heuristic: `depth / n²`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DepthRatio;

impl Evaluator for DepthRatio {
    fn evaluate(&self, node: &TourNode, board: &Board) -> f64 {
        f64::from(node.depth) / f64::from(board.cells())
    }
}
