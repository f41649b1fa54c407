//! # knight-tour
//!
//! Knight's Tour search on an n×n board using Monte Carlo Tree Search.
//!
//! ## Design Principles
//!
//! 1. **Evaluator instead of rollouts**: New nodes are scored by a pluggable
//!    [`Evaluator`]. The default scores a partial tour by how much of the
//!    board it covers.
//!
//! 2. **Path-relative validity**: A move is legal if the target square is
//!    on the board and not on the node's own ancestor chain.
//!
//! 3. **Bounded**: Every search runs under a wall-clock budget, with an
//!    optional iteration cap and a hard cap on tree size.
//!
//! ## Architecture
//!
//! - **Arena tree**: Nodes live in a `Vec` and refer to each other by
//!   [`NodeId`]. Parents are back-references, children are owned by the
//!   arena.
//!
//! - **Event stream**: The search reports each iteration and its halt
//!   reason as [`SearchEvent`]s. Rendering them is the caller's job.
//!
//! ## Modules
//!
//! - `core`: Board geometry, positions, knight moves, seeded RNG
//! - `mcts`: Tree, selection, evaluation and the search loop
//! - `report`: Tour reconstruction, validation and text output

pub mod core;
pub mod mcts;
pub mod report;

// Re-export commonly used types
pub use crate::core::{Board, BoardError, Position, TourRng, TourRngState};

pub use crate::mcts::{
    DepthRatio, Evaluator, EventSink, HaltReason, IterationEvent, KnightSearch, NodeId, NullSink,
    Outcome, SearchConfig, SearchError, SearchEvent, SearchStats, SelectionPolicy, TimeBudget,
    TourNode, TourTree, Uct,
};

pub use crate::report::{BoardGrid, MemoryReport, MovesLog, TourError, TourPath, TourStep};
