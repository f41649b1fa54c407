//! Tour reconstruction and validation.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Board, Position};
use crate::mcts::{NodeId, TourTree};

/// Reasons a path is not a complete knight's tour.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TourError {
    #[error("tour has {actual} steps, expected {expected}")]
    WrongLength { expected: usize, actual: usize },

    #[error("step {step} at {position} is off the board")]
    OffBoard { step: usize, position: Position },

    #[error("step {step} revisits {position}")]
    Revisited { step: usize, position: Position },

    #[error("step {step} from {from} to {to} is not a knight move")]
    NotAKnightMove { step: usize, from: Position, to: Position },

    #[error("step {step} has depth {depth}")]
    DepthMismatch { step: usize, depth: u16 },
}

/// One square of a tour with its visit order (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourStep {
    pub position: Position,
    pub depth: u16,
}

/// Ordered squares from the root to a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourPath {
    steps: Vec<TourStep>,
}

impl TourPath {
    /// Walk parent links from `id` and reverse into root-first order.
    #[must_use]
    pub fn from_tree(tree: &TourTree, id: NodeId) -> Self {
        let steps = tree
            .path_ids(id)
            .into_iter()
            .map(|i| {
                let node = tree.get(i);
                TourStep {
                    position: node.position,
                    depth: node.depth,
                }
            })
            .collect();
        Self { steps }
    }

    /// Build a path from explicit steps.
    #[must_use]
    pub fn from_steps(steps: Vec<TourStep>) -> Self {
        Self { steps }
    }

    /// Steps in visiting order.
    #[must_use]
    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    /// Positions in visiting order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.steps.iter().map(|s| s.position)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the path is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check the path is a complete open tour of `board`: n² steps, every
    /// square once, consecutive squares a knight move apart, and depths
    /// counting up from 1.
    pub fn validate(&self, board: &Board) -> Result<(), TourError> {
        let expected = usize::from(board.cells());
        if self.steps.len() != expected {
            return Err(TourError::WrongLength {
                expected,
                actual: self.steps.len(),
            });
        }

        let mut seen = FxHashSet::default();
        for (i, step) in self.steps.iter().enumerate() {
            let position = step.position;
            if !board.contains(i16::from(position.x), i16::from(position.y)) {
                return Err(TourError::OffBoard { step: i, position });
            }
            if !seen.insert(position) {
                return Err(TourError::Revisited { step: i, position });
            }
            if usize::from(step.depth) != i + 1 {
                return Err(TourError::DepthMismatch {
                    step: i,
                    depth: step.depth,
                });
            }
        }

        for (i, pair) in self.steps.windows(2).enumerate() {
            let (from, to) = (pair[0].position, pair[1].position);
            if from.knight_offset_to(to).is_none() {
                return Err(TourError::NotAKnightMove { step: i + 1, from, to });
            }
        }

        Ok(())
    }
}

impl std::fmt::Display for TourPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Knight Tour Path:")?;
        for step in &self.steps {
            writeln!(
                f,
                "Step {}: ({}, {}) -> {}",
                step.depth,
                step.position.x,
                step.position.y,
                step.position.algebraic()
            )?;
        }
        Ok(())
    }
}
