//! Per-search statistics
//!
//! Both engines fill a fresh [`SearchStatistics`] on every call to `search()`.

use std::time::Duration;

/// What one search did and how long it took
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStatistics {
    /// Iterations the search was allowed
    pub budget: usize,

    /// Iterations that ran to completion
    pub iterations: usize,

    /// Nodes whose children were generated
    pub expansions: usize,

    /// Wall time of the iteration loop
    pub total_time: Duration,

    /// Nodes in the tree when the search finished, root included
    pub tree_size: usize,

    /// Deepest node reached while descending
    pub max_depth: usize,

    /// Value of the recommended root child, if one was chosen
    pub best_value: Option<f64>,

    /// Whether a cancellation token ended the search before the budget ran out
    pub stopped_early: bool,
}

impl SearchStatistics {
    /// Statistics for a search that has not run yet
    pub fn new(budget: usize) -> Self {
        SearchStatistics {
            budget,
            iterations: 0,
            expansions: 0,
            total_time: Duration::ZERO,
            tree_size: 1,
            max_depth: 0,
            best_value: None,
            stopped_early: false,
        }
    }

    /// Share of the budget that completed, between 0 and 1
    pub fn completion(&self) -> f64 {
        if self.budget == 0 {
            return 0.0;
        }
        self.iterations as f64 / self.budget as f64
    }

    /// Mean wall time per iteration in microseconds
    pub fn avg_time_per_iteration_us(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.total_time.as_micros() as f64 / self.iterations as f64
    }

    /// Iterations per second of wall time
    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.total_time.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.iterations as f64 / secs
    }

    /// Multi-line report for logs and demos
    pub fn summary(&self) -> String {
        let best_value = match self.best_value {
            Some(value) => format!("{:.3}", value),
            None => "n/a".to_string(),
        };

        format!(
            "Search statistics:\n\
             - Iterations: {} of {} ({:.0}%{})\n\
             - Expansions: {}\n\
             - Tree size: {} nodes, max depth {}\n\
             - Best value: {}\n\
             - Time: {:.3} s ({:.1} it/s)",
            self.iterations,
            self.budget,
            self.completion() * 100.0,
            if self.stopped_early { ", cancelled" } else { "" },
            self.expansions,
            self.tree_size,
            self.max_depth,
            best_value,
            self.total_time.as_secs_f64(),
            self.iterations_per_second()
        )
    }
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new(0)
    }
}
