//! Turning a finished search into human-readable output.
//!
//! A solved search produces `path.txt` (the ordered squares) and
//! `board.txt` (the grid of visit numbers). Every run produces `moves.txt`
//! from the event stream, and a run that exhausts the arena produces
//! `OutOfMem.txt`.

pub mod grid;
pub mod log;
pub mod path;

use std::fs;
use std::io;
use std::path::Path;

pub use grid::BoardGrid;
pub use log::{MemoryReport, MovesLog};
pub use path::{TourError, TourPath, TourStep};

pub const PATH_FILE: &str = "path.txt";
pub const BOARD_FILE: &str = "board.txt";
pub const MOVES_FILE: &str = "moves.txt";
pub const MEMORY_FILE: &str = "OutOfMem.txt";

/// Write `path.txt` and `board.txt` into `dir`.
pub fn write_solution(dir: &Path, path: &TourPath, grid: &BoardGrid) -> io::Result<()> {
    fs::write(dir.join(PATH_FILE), path.to_string())?;
    fs::write(dir.join(BOARD_FILE), grid.to_string())
}

/// Write `OutOfMem.txt` into `dir`.
pub fn write_memory_report(dir: &Path, report: &MemoryReport) -> io::Result<()> {
    fs::write(dir.join(MEMORY_FILE), report.to_string())
}
