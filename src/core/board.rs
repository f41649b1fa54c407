//! Board geometry and knight move generation.
//!
//! The board only knows its size and the eight knight offsets. Whether a
//! square is free depends on the partial tour that reaches it, so every
//! validity check takes the ancestor chain of positions explicitly. A square
//! that is occupied in one branch of the search tree can be free in a
//! sibling branch.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// The eight knight move offsets as `(dx, dy)`.
pub const KNIGHT_MOVES: [(i8, i8); 8] = [
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
];

/// Largest supported board side. Keeps `n * n` within a `u16` depth.
pub const MAX_BOARD_SIZE: u8 = u8::MAX;

/// Errors raised while configuring a board.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board size {0}: must be between 1 and 255")]
    InvalidSize(i64),
}

/// A square on the board, 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    /// The fixed starting square.
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    /// Create a new position.
    #[must_use]
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Apply an offset, returning signed coordinates that may be off-board.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: i8, dy: i8) -> (i16, i16) {
        (i16::from(self.x) + i16::from(dx), i16::from(self.y) + i16::from(dy))
    }

    /// The knight offset leading from `self` to `other`, if they are one
    /// knight move apart.
    #[must_use]
    pub fn knight_offset_to(self, other: Position) -> Option<(i8, i8)> {
        let dx = i16::from(other.x) - i16::from(self.x);
        let dy = i16::from(other.y) - i16::from(self.y);
        KNIGHT_MOVES
            .iter()
            .copied()
            .find(|&(mx, my)| i16::from(mx) == dx && i16::from(my) == dy)
    }

    /// Chess-style square name: file from `y`, rank from `x + 1`.
    #[must_use]
    pub fn algebraic(self) -> String {
        let file = char::from_u32(u32::from('a') + u32::from(self.y)).unwrap_or('?');
        format!("{}{}", file, u16::from(self.x) + 1)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// An n×n board. Immutable for the lifetime of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: u8,
}

impl Board {
    /// Create a board of side `size`.
    ///
    /// Sizes outside `1..=255` are rejected before any search starts.
    pub fn new(size: i64) -> Result<Self, BoardError> {
        match u8::try_from(size) {
            Ok(n) if n > 0 => Ok(Self { size: n }),
            _ => Err(BoardError::InvalidSize(size)),
        }
    }

    /// Side length.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> u8 {
        self.size
    }

    /// Number of squares, which is also the depth of a complete tour.
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> u16 {
        self.size as u16 * self.size as u16
    }

    /// The fixed knight offsets.
    #[must_use]
    pub const fn move_offsets() -> &'static [(i8, i8); 8] {
        &KNIGHT_MOVES
    }

    /// Whether signed coordinates fall on the board.
    #[inline]
    #[must_use]
    pub fn contains(&self, x: i16, y: i16) -> bool {
        let n = i16::from(self.size);
        (0..n).contains(&x) && (0..n).contains(&y)
    }

    /// Check that `(x, y)` is on the board and not on the ancestor chain.
    ///
    /// `ancestry` yields the positions from the current node up to the root.
    /// The walk is O(depth).
    pub fn is_valid_move<I>(&self, ancestry: I, x: i16, y: i16) -> bool
    where
        I: IntoIterator<Item = Position>,
    {
        if !self.contains(x, y) {
            return false;
        }
        ancestry
            .into_iter()
            .all(|p| i16::from(p.x) != x || i16::from(p.y) != y)
    }

    /// Squares reachable by one valid knight move from the head of the
    /// ancestor chain, in `KNIGHT_MOVES` order.
    pub fn successors<I>(&self, ancestry: I) -> SmallVec<[Position; 8]>
    where
        I: IntoIterator<Item = Position>,
        I::IntoIter: Clone,
    {
        let chain = ancestry.into_iter();
        let Some(head) = chain.clone().next() else {
            return SmallVec::new();
        };

        KNIGHT_MOVES
            .iter()
            .filter_map(|&(dx, dy)| {
                let (x, y) = head.offset(dx, dy);
                // In range once validity holds, so the narrowing is lossless.
                self.is_valid_move(chain.clone(), x, y)
                    .then(|| Position::new(x as u8, y as u8))
            })
            .collect()
    }

    /// A node at `depth` completes the tour.
    #[inline]
    #[must_use]
    pub const fn is_goal(&self, depth: u16) -> bool {
        depth == self.cells()
    }
}
