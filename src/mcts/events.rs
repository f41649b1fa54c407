//! Per-iteration search events and the sinks that consume them.
//!
//! Every iteration produces one `SearchEvent::Iteration`; the stream ends
//! with exactly one `SearchEvent::Halted`. The `Display` impls render the
//! plain-text move log, one or more lines per event.

use std::io;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Position;

/// Why a search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HaltReason {
    /// A complete tour was evaluated.
    GoalReached,
    /// The wall-clock budget ran out.
    TimeExceeded,
    /// The configured iteration cap was hit.
    IterationLimit,
    /// Selection found nothing left to descend into.
    Exhausted,
}

impl HaltReason {
    /// Whether this reason comes with a solution.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == HaltReason::GoalReached
    }
}

impl std::fmt::Display for HaltReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            HaltReason::GoalReached => "goal reached",
            HaltReason::TimeExceeded => "time budget exceeded",
            HaltReason::IterationLimit => "iteration limit reached",
            HaltReason::Exhausted => "no further expansion possible",
        };
        f.write_str(text)
    }
}

/// What happened in one Select/Expand/Evaluate/Backpropagate cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IterationEvent {
    /// 0-based iteration index.
    pub iteration: u64,

    /// Node returned by selection.
    pub selected: Position,

    /// Depth of the selected node.
    pub depth: u16,

    /// Children newly attached to the selected node, at `depth + 1`.
    pub expanded: SmallVec<[Position; 8]>,

    /// Reward backpropagated this iteration.
    pub reward: f64,
}

impl std::fmt::Display for IterationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Iteration {}: Selected Node {} Depth {}",
            self.iteration, self.selected, self.depth
        )?;
        for position in &self.expanded {
            writeln!(f, "    Expanded to {} Depth {}", position, self.depth + 1)?;
        }
        write!(f, "    Simulation reward: {}", self.reward)
    }
}

/// An entry in the search event stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SearchEvent {
    Iteration(IterationEvent),
    Halted { iteration: u64, reason: HaltReason },
}

impl SearchEvent {
    /// Check if this is the final event of a search.
    #[must_use]
    pub fn is_halt(&self) -> bool {
        matches!(self, SearchEvent::Halted { .. })
    }
}

impl std::fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchEvent::Iteration(event) => event.fmt(f),
            SearchEvent::Halted {
                iteration,
                reason: HaltReason::GoalReached,
            } => write!(f, "Goal reached at iteration {}", iteration),
            SearchEvent::Halted { iteration, reason } => {
                write!(f, "Search ended at iteration {} ({})", iteration, reason)
            }
        }
    }
}

/// Receives search events as they happen.
pub trait EventSink {
    /// Record one event.
    fn record(&mut self, event: &SearchEvent) -> io::Result<()>;
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn record(&mut self, event: &SearchEvent) -> io::Result<()> {
        (**self).record(event)
    }
}

impl EventSink for Vec<SearchEvent> {
    fn record(&mut self, event: &SearchEvent) -> io::Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&mut self, _event: &SearchEvent) -> io::Result<()> {
        Ok(())
    }
}
