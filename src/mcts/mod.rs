//! Monte Carlo Tree Search for the Knight's Tour.
//!
//! ## Overview
//!
//! Each node of the tree is a partial tour starting at `(0, 0)`. An
//! iteration selects a node with UCT, expands every valid knight move from
//! it, picks one new child at random, scores it with an [`Evaluator`]
//! instead of a random rollout, and backpropagates the score to the root.
//!
//! - **Path-relative validity**: a square is free if it is not on the
//!   node's own ancestor chain, regardless of other branches
//! - **Infinite priority**: every child is visited once before UCT
//!   exploitation kicks in
//! - **Time-bounded**: the deadline is checked once per iteration
//! - **Reproducible**: the random source is passed in and can be seeded
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use knight_tour::core::{Board, TourRng};
//! use knight_tour::mcts::{DepthRatio, KnightSearch, NullSink, Outcome, SearchConfig};
//!
//! let board = Board::new(5).unwrap();
//! let config = SearchConfig::default().with_time_budget(Duration::from_secs(120));
//! let mut search = KnightSearch::new(board, config, DepthRatio, TourRng::new(42));
//!
//! if let Outcome::Solved(node) = search.run(NullSink).unwrap() {
//!     assert_eq!(search.tree().get(node).depth, 25);
//! }
//! ```

pub mod config;
pub mod evaluator;
pub mod events;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{SearchConfig, TimeBudget};
pub use evaluator::{DepthRatio, Evaluator};
pub use events::{EventSink, HaltReason, IterationEvent, NullSink, SearchEvent};
pub use node::{NodeId, TourNode};
pub use policy::{SelectionPolicy, Uct};
pub use search::{Events, KnightSearch, Outcome, SearchError};
pub use stats::SearchStats;
pub use tree::{MemoryStats, TourTree, TreeError, TreeStats};
