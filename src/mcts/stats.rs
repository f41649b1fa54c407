//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

use super::events::HaltReason;

/// Statistics collected during a search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Completed iterations.
    pub iterations: u64,

    /// Nodes added to the tree.
    pub nodes_expanded: u64,

    /// Evaluator calls.
    pub evaluations: u64,

    /// Deepest node ever selected or evaluated.
    pub max_depth: u16,

    /// Total time spent searching (microseconds).
    pub time_us: u64,

    /// Why the search stopped, once it has.
    pub halt_reason: Option<HaltReason>,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every counter and the halt reason.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Elapsed search time in seconds.
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.time_us as f64 / 1e6
    }

    /// Search throughput, 0 before any time has been recorded.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        match self.time_us {
            0 => 0.0,
            _ => self.iterations as f64 / self.seconds(),
        }
    }

    /// Mean number of children attached per iteration.
    #[must_use]
    pub fn avg_nodes_per_iteration(&self) -> f64 {
        match self.iterations {
            0 => 0.0,
            n => self.nodes_expanded as f64 / n as f64,
        }
    }
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} iterations, {} nodes, depth {}, {:.0} it/s",
            self.iterations,
            self.nodes_expanded,
            self.max_depth,
            self.iterations_per_second()
        )
    }
}
