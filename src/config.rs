//! Configuration options for the MCTS algorithm
//!
//! This module defines the parameters shared by [`MCTS`](crate::MCTS) and
//! [`RecursiveMCTS`](crate::RecursiveMCTS).

use crate::{MCTSError, Result};

/// Configuration for the MCTS algorithm
///
/// Use the builder methods to create a customized configuration.
///
/// # Example
///
/// ```
/// use uct_planner::MCTSConfig;
///
/// let config = MCTSConfig::default()
///     .with_exploration_constant(1.5)
///     .with_budget(5_000)
///     .with_max_depth(9)
///     .with_seed(42);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MCTSConfig {
    /// Exploration constant for UCT
    ///
    /// Higher values favor exploration of less-visited nodes.
    /// The standard value is sqrt(2) ≈ 1.414.
    pub exploration_constant: f64,

    /// Number of select/expand/simulate/backpropagate iterations per search
    pub budget: usize,

    /// Nodes at this depth are never expanded and stay leaves for the whole search
    pub max_depth: usize,

    /// Seed for every random choice made during search
    ///
    /// `None` seeds from the operating system, which makes searches non-reproducible.
    pub seed: Option<u64>,

    /// Per-ply discount applied by the recursive-backup engine
    ///
    /// Ignored by the rollout engine.
    pub discount: f64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        MCTSConfig {
            exploration_constant: 1.414, // sqrt(2)
            budget: 1200,
            max_depth: 5,
            seed: None,
            discount: 1.0,
        }
    }
}

impl MCTSConfig {
    /// Sets the exploration constant
    pub fn with_exploration_constant(mut self, constant: f64) -> Self {
        self.exploration_constant = constant;
        self
    }

    /// Sets the number of iterations
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the maximum expansion depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the discount used by the recursive-backup engine
    pub fn with_discount(mut self, discount: f64) -> Self {
        self.discount = discount;
        self
    }

    /// Checks that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if self.budget == 0 {
            return Err(MCTSError::InvalidConfiguration(
                "budget must be at least 1".to_string(),
            ));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant <= 0.0 {
            return Err(MCTSError::InvalidConfiguration(format!(
                "exploration constant must be positive and finite, got {}",
                self.exploration_constant
            )));
        }
        if self.max_depth == 0 {
            return Err(MCTSError::InvalidConfiguration(
                "max depth must be at least 1".to_string(),
            ));
        }
        if !(self.discount > 0.0 && self.discount <= 1.0) {
            return Err(MCTSError::InvalidConfiguration(format!(
                "discount must lie in (0, 1], got {}",
                self.discount
            )));
        }
        Ok(())
    }
}
