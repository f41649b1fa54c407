//! Search configuration parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Wall-clock budget for a search, entered in minutes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBudget(Duration);

impl TimeBudget {
    /// Convert a user-supplied minute count. Non-positive values become a
    /// zero budget, which halts the search on its first step.
    #[must_use]
    pub fn from_minutes(minutes: i64) -> Self {
        let millis = u64::try_from(minutes).unwrap_or(0).saturating_mul(60 * 1000);
        Self(Duration::from_millis(millis))
    }

    /// The budget as a duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        self.0
    }
}

impl From<TimeBudget> for Duration {
    fn from(budget: TimeBudget) -> Self {
        budget.0
    }
}

/// Search configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// UCT exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Wall-clock time the search may run.
    pub time_budget: Duration,

    /// Stop after this many iterations (None = no cap).
    pub max_iterations: Option<u64>,

    /// Maximum nodes to allocate in the tree.
    /// Reaching it is reported as memory exhaustion.
    pub max_nodes: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            time_budget: Duration::from_secs(60),
            max_iterations: None,
            max_nodes: 50_000_000,
        }
    }
}

impl SearchConfig {
    /// Create a new config with custom exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Create a new config with a custom time budget.
    pub fn with_time_budget(mut self, budget: impl Into<Duration>) -> Self {
        self.time_budget = budget.into();
        self
    }

    /// Create a new config with an iteration cap.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    /// Create a new config with a custom node limit.
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!((config.exploration_constant - std::f64::consts::SQRT_2).abs() < 0.001);
        assert_eq!(config.time_budget, Duration::from_secs(60));
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.max_nodes, 50_000_000);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SearchConfig::default()
            .with_exploration(2.0)
            .with_time_budget(TimeBudget::from_minutes(2))
            .with_max_iterations(500)
            .with_max_nodes(1000);

        assert_eq!(config.exploration_constant, 2.0);
        assert_eq!(config.time_budget, Duration::from_secs(120));
        assert_eq!(config.max_iterations, Some(500));
        assert_eq!(config.max_nodes, 1000);
    }

    #[test]
    fn test_time_budget_from_minutes() {
        assert_eq!(TimeBudget::from_minutes(3).as_duration(), Duration::from_millis(180_000));
        assert_eq!(TimeBudget::from_minutes(0).as_duration(), Duration::ZERO);
        assert_eq!(TimeBudget::from_minutes(-5).as_duration(), Duration::ZERO);
    }

    #[test]
    fn test_serialization() {
        let config = SearchConfig::default().with_max_iterations(7);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: SearchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.max_iterations, deserialized.max_iterations);
        assert_eq!(config.time_budget, deserialized.time_budget);
    }
}
