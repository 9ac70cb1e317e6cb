//! Backpropagation policies for the MCTS algorithm
//!
//! Backpropagation policies turn a simulation's winner into statistics updates on
//! each node of the path back to the root.

use crate::{game_state::GameState, tree::MCTSNode, utils::credit};

/// Trait for policies that backpropagate simulation results
pub trait BackpropagationPolicy<S: GameState> {
    /// Updates one node for a simulation won by `winner` (`None` for a draw)
    fn update_stats(&self, node: &mut MCTSNode<S>, winner: Option<&S::Player>);

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<S>>;
}

/// Standard backpropagation policy
///
/// Adds one visit to the node and credits its mover: +1 if the mover won, -1 if the mover
/// lost, nothing on a draw. The node's value is the resulting mean reward.
#[derive(Debug, Clone)]
pub struct StandardPolicy;

impl StandardPolicy {
    /// Creates a new standard policy
    pub fn new() -> Self {
        StandardPolicy
    }
}

impl Default for StandardPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> BackpropagationPolicy<S> for StandardPolicy {
    fn update_stats(&self, node: &mut MCTSNode<S>, winner: Option<&S::Player>) {
        let reward = credit(&node.mover, winner);
        node.record(reward);
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<S>> {
        Box::new(self.clone())
    }
}

// Implement BackpropagationPolicy for Box<dyn BackpropagationPolicy>
impl<S: GameState> BackpropagationPolicy<S> for Box<dyn BackpropagationPolicy<S>> {
    fn update_stats(&self, node: &mut MCTSNode<S>, winner: Option<&S::Player>) {
        (**self).update_stats(node, winner)
    }

    fn clone_box(&self) -> Box<dyn BackpropagationPolicy<S>> {
        (**self).clone_box()
    }
}
