//! Text sinks for the move log and the memory report.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::mcts::{EventSink, MemoryStats, SearchEvent};

/// Writes every search event as text, one block per event.
#[derive(Debug)]
pub struct MovesLog<W: Write> {
    writer: W,
    events: u64,
}

impl MovesLog<BufWriter<File>> {
    /// Create (or truncate) a log file.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> MovesLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, events: 0 }
    }

    /// Events written so far.
    #[must_use]
    pub fn events(&self) -> u64 {
        self.events
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> EventSink for MovesLog<W> {
    fn record(&mut self, event: &SearchEvent) -> io::Result<()> {
        writeln!(self.writer, "{}", event)?;
        self.events += 1;
        if event.is_halt() {
            self.writer.flush()?;
        }
        Ok(())
    }
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Report written when the node arena can no longer grow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryReport {
    pub stats: MemoryStats,
}

impl MemoryReport {
    pub fn new(stats: MemoryStats) -> Self {
        Self { stats }
    }
}

impl std::fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mb = |bytes: usize| bytes as f64 / BYTES_PER_MB;
        writeln!(f, "Out of Memory Error occurred.")?;
        writeln!(f, "Arena capacity: {:.2} MB", mb(self.stats.capacity_bytes))?;
        writeln!(f, "Used memory: {:.2} MB", mb(self.stats.used_bytes))?;
        writeln!(f, "Free memory: {:.2} MB", mb(self.stats.free_bytes))?;
        writeln!(f, "Nodes allocated: {}", self.stats.node_count)?;
        writeln!(f, "Error: Ran out of memory. Please try a smaller board size.")
    }
}
