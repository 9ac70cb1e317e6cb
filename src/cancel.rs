//! Cooperative cancellation for running searches
//!
//! The planners check the token between iterations only. An iteration that has started
//! always runs to completion, so the tree is never left half-updated.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Shared flag that asks a running search to stop early
///
/// Clones share the same flag, so one clone can be handed to the planner and another
/// kept by whoever decides to stop it (a signal handler, a timer thread, a UI).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns true once cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
