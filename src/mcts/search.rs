//! Core MCTS search loop.
//!
//! One step is one Select → Expand → Choose-one-child → Evaluate →
//! Backpropagate cycle. The termination policy runs at the top of every
//! step, before selection, which makes the iteration boundary the only
//! cancellation point.

use std::time::Instant;

use log::{debug, error, info, trace};
use smallvec::SmallVec;
use thiserror::Error;

use crate::core::{Board, Position, TourRng};

use super::config::SearchConfig;
use super::evaluator::Evaluator;
use super::events::{EventSink, HaltReason, IterationEvent, SearchEvent};
use super::node::NodeId;
use super::policy::{SelectionPolicy, Uct};
use super::stats::SearchStats;
use super::tree::{MemoryStats, TourTree, TreeError};

/// Errors that abort a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("ran out of memory with {} nodes in the tree", .stats.node_count)]
    OutOfMemory {
        stats: MemoryStats,
        #[source]
        source: TreeError,
    },

    #[error("failed to record search event: {0}")]
    Sink(#[from] std::io::Error),
}

/// Result of a finished search.
///
/// Running out of time and exhausting the tree are both `NoSolution`; the
/// event stream and `SearchStats::halt_reason` tell them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A complete tour ends at this node.
    Solved(NodeId),
    /// No tour was found within the budget.
    NoSolution,
}

impl Outcome {
    /// Check if a tour was found.
    #[must_use]
    pub fn is_solved(self) -> bool {
        matches!(self, Outcome::Solved(_))
    }

    /// The terminal node, if solved.
    #[must_use]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Outcome::Solved(id) => Some(id),
            Outcome::NoSolution => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    Finished(Outcome),
    Failed,
}

/// Knight's Tour search context.
///
/// Generic over the evaluator. Owns the tree, the random source and the
/// configuration. Drive it with [`KnightSearch::run`], or pull events
/// lazily with [`KnightSearch::events`].
pub struct KnightSearch<E: Evaluator> {
    board: Board,
    config: SearchConfig,
    tree: TourTree,
    evaluator: E,
    rng: TourRng,
    selection: Box<dyn SelectionPolicy>,
    stats: SearchStats,
    started: Option<Instant>,
    /// Goal node and the iteration that produced it.
    solution: Option<(NodeId, u64)>,
    phase: Phase,
}

impl<E: Evaluator> KnightSearch<E> {
    /// Create a search rooted at `(0, 0)`.
    pub fn new(board: Board, config: SearchConfig, evaluator: E, rng: TourRng) -> Self {
        let tree = TourTree::with_limit(Position::ORIGIN, config.max_nodes);
        let solution = tree
            .is_goal(&board, tree.root())
            .then_some((tree.root(), 0));

        Self {
            board,
            config,
            tree,
            evaluator,
            rng,
            selection: Box::new(Uct),
            stats: SearchStats::default(),
            started: None,
            solution,
            phase: Phase::Running,
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Run until the search halts, pushing every event into `sink`.
    ///
    /// A search that already failed with memory exhaustion reports
    /// `NoSolution` on later calls.
    pub fn run<S: EventSink>(&mut self, mut sink: S) -> Result<Outcome, SearchError> {
        while let Some(event) = self.step()? {
            sink.record(&event)?;
        }
        Ok(self.outcome().unwrap_or(Outcome::NoSolution))
    }

    /// Lazily step the search, one event per item.
    ///
    /// The iterator is finite: it ends right after the `Halted` event, or
    /// after yielding an error.
    pub fn events(&mut self) -> Events<'_, E> {
        Events { search: self }
    }

    /// Advance by one event. Returns `Ok(None)` once the search is over.
    pub fn step(&mut self) -> Result<Option<SearchEvent>, SearchError> {
        if self.phase != Phase::Running {
            return Ok(None);
        }
        let start = *self.started.get_or_insert_with(Instant::now);

        if let Some((goal, iteration)) = self.solution {
            return Ok(Some(self.halt(start, Outcome::Solved(goal), HaltReason::GoalReached, iteration)));
        }
        let completed = self.stats.iterations;
        if start.elapsed() >= self.config.time_budget {
            return Ok(Some(self.halt(start, Outcome::NoSolution, HaltReason::TimeExceeded, completed)));
        }
        if self.config.max_iterations.is_some_and(|cap| completed >= cap) {
            return Ok(Some(self.halt(start, Outcome::NoSolution, HaltReason::IterationLimit, completed)));
        }
        let Some(selected) = self.select() else {
            return Ok(Some(self.halt(start, Outcome::NoSolution, HaltReason::Exhausted, completed)));
        };

        match self.iterate(selected) {
            Ok(event) => {
                self.stats.time_us = start.elapsed().as_micros() as u64;
                Ok(Some(SearchEvent::Iteration(event)))
            }
            Err(source) => {
                self.phase = Phase::Failed;
                self.stats.time_us = start.elapsed().as_micros() as u64;
                let stats = self.tree.memory_stats();
                error!(
                    "out of memory at iteration {}: {} nodes, capacity {} bytes, used {} bytes, free {} bytes ({})",
                    completed, stats.node_count, stats.capacity_bytes, stats.used_bytes, stats.free_bytes, source
                );
                Err(SearchError::OutOfMemory { stats, source })
            }
        }
    }

    /// One full cycle from an already selected node.
    fn iterate(&mut self, selected: NodeId) -> Result<IterationEvent, TreeError> {
        let iteration = self.stats.iterations;
        let (position, depth) = {
            let node = self.tree.get(selected);
            (node.position, node.depth)
        };

        let expanded = if self.tree.is_goal(&self.board, selected) {
            SmallVec::new()
        } else {
            self.expand(selected)?
        };

        let target = self.choose_child(selected);
        let reward = self.evaluate(target);
        self.tree.backpropagate(target, reward);

        self.stats.iterations += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.tree.get(target).depth);
        if self.tree.is_goal(&self.board, target) {
            self.solution = Some((target, iteration));
        }

        trace!(
            "iteration {}: selected {} depth {}, expanded {}, reward {}",
            iteration,
            position,
            depth,
            expanded.len(),
            reward
        );

        Ok(IterationEvent {
            iteration,
            selected: position,
            depth,
            expanded,
            reward,
        })
    }

    /// Descend from the root to the node to expand.
    ///
    /// Returns `None` when a fully expanded node offers no child to descend
    /// into.
    fn select(&self) -> Option<NodeId> {
        let mut current = self.tree.root();

        while !self.tree.get(current).is_leaf() {
            if !self.tree.is_fully_expanded(&self.board, current) {
                return Some(current);
            }
            current = self
                .selection
                .select(&self.tree, current, self.config.exploration_constant)?;
            if self.tree.is_goal(&self.board, current) {
                break;
            }
        }

        Some(current)
    }

    /// Attach every valid child not already present, returning the new
    /// positions.
    fn expand(&mut self, id: NodeId) -> Result<SmallVec<[Position; 8]>, TreeError> {
        let candidates = self.tree.expand(&self.board, id);
        self.tree.get_mut(id).legal_moves = u8::try_from(candidates.len()).ok();

        let mut added = SmallVec::new();
        for child in candidates {
            let present = self
                .tree
                .get(id)
                .children
                .iter()
                .any(|&c| self.tree.get(c).position == child.position);
            if present {
                continue;
            }
            let position = child.position;
            self.tree.attach(child)?;
            self.stats.nodes_expanded += 1;
            added.push(position);
        }

        if !added.is_empty() {
            debug!("expanded {} with {} children", self.tree.get(id).position, added.len());
        }
        Ok(added)
    }

    /// Uniform random child of `id`, or `id` itself when it has none.
    fn choose_child(&mut self, id: NodeId) -> NodeId {
        self.rng
            .choose(&self.tree.get(id).children)
            .copied()
            .unwrap_or(id)
    }

    /// Evaluator score, forced to 1.0 for a complete tour.
    fn evaluate(&mut self, id: NodeId) -> f64 {
        let value = self.evaluator.evaluate(self.tree.get(id), &self.board);
        self.stats.evaluations += 1;
        if self.tree.is_goal(&self.board, id) {
            1.0
        } else {
            value
        }
    }

    fn halt(&mut self, start: Instant, outcome: Outcome, reason: HaltReason, iteration: u64) -> SearchEvent {
        self.phase = Phase::Finished(outcome);
        self.stats.halt_reason = Some(reason);
        self.stats.time_us = start.elapsed().as_micros() as u64;
        info!(
            "search halted ({}) after {} iterations in {:.3}s, {} nodes",
            reason,
            self.stats.iterations,
            self.stats.seconds(),
            self.tree.len()
        );
        SearchEvent::Halted { iteration, reason }
    }

    /// The final outcome, once the search has halted.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Finished(outcome) => Some(outcome),
            Phase::Running | Phase::Failed => None,
        }
    }

    /// Check if no further events will be produced.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase != Phase::Running
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree.
    #[must_use]
    pub fn tree(&self) -> &TourTree {
        &self.tree
    }

    /// Get the board.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Get the evaluator.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Get the random source.
    pub fn rng(&self) -> &TourRng {
        &self.rng
    }
}

/// Lazy event stream over a running search.
pub struct Events<'a, E: Evaluator> {
    search: &'a mut KnightSearch<E>,
}

impl<E: Evaluator> Iterator for Events<'_, E> {
    type Item = Result<SearchEvent, SearchError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.search.step().transpose()
    }
}

impl<E: Evaluator> std::iter::FusedIterator for Events<'_, E> {}
