//! Core types: board geometry, positions, knight moves and the random
//! source.
//!
//! Nothing here knows about the search tree.

pub mod board;
pub mod rng;

pub use board::{Board, BoardError, Position, KNIGHT_MOVES, MAX_BOARD_SIZE};
pub use rng::{TourRng, TourRngState};
