//! Board grid annotated with visit order.

use serde::{Deserialize, Serialize};

use crate::core::{Board, Position};

use super::path::TourPath;

/// An n×n grid where each visited cell holds its depth in the tour and
/// unvisited cells hold 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardGrid {
    size: u8,
    cells: Vec<u16>,
}

impl BoardGrid {
    /// Lay `path` out on an empty grid. Steps off the board are ignored.
    #[must_use]
    pub fn from_path(board: &Board, path: &TourPath) -> Self {
        let n = usize::from(board.size());
        let mut cells = vec![0; n * n];
        for step in path.steps() {
            let (x, y) = (usize::from(step.position.x), usize::from(step.position.y));
            if x < n && y < n {
                cells[x * n + y] = step.depth;
            }
        }
        Self {
            size: board.size(),
            cells,
        }
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Visit order at `position`, 0 when unvisited.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<u16> {
        let n = usize::from(self.size);
        let (x, y) = (usize::from(position.x), usize::from(position.y));
        (x < n && y < n).then(|| self.cells[x * n + y])
    }
}

impl std::fmt::Display for BoardGrid {
    /// Rows from `x = n - 1` down to `0`, each cell right-aligned to four
    /// columns.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = usize::from(self.size);
        for x in (0..n).rev() {
            for y in 0..n {
                write!(f, "{:4} ", self.cells[x * n + y])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::TourStep;

    #[test]
    fn test_from_path() {
        let board = Board::new(3).unwrap();
        let path = TourPath::from_steps(vec![
            TourStep {
                position: Position::new(0, 0),
                depth: 1,
            },
            TourStep {
                position: Position::new(2, 1),
                depth: 2,
            },
        ]);

        let grid = BoardGrid::from_path(&board, &path);

        assert_eq!(grid.size(), 3);
        assert_eq!(grid.get(Position::new(0, 0)), Some(1));
        assert_eq!(grid.get(Position::new(2, 1)), Some(2));
        assert_eq!(grid.get(Position::new(1, 1)), Some(0));
        assert_eq!(grid.get(Position::new(3, 0)), None);
    }

    #[test]
    fn test_display_puts_last_row_first() {
        let board = Board::new(2).unwrap();
        let path = TourPath::from_steps(vec![
            TourStep {
                position: Position::new(0, 0),
                depth: 1,
            },
            TourStep {
                position: Position::new(1, 1),
                depth: 4,
            },
        ]);

        let grid = BoardGrid::from_path(&board, &path);

        assert_eq!(grid.to_string(), "   0    4 \n   1    0 \n");
    }
}
