//! Simulation policies for the MCTS algorithm
//!
//! Simulation policies play a game out from a frontier node to estimate its value.
//! They never add nodes to the tree.

use rand::RngCore;

use crate::{game_state::GameState, Result};

/// Trait for policies that simulate games
pub trait SimulationPolicy<S: GameState> {
    /// Plays out a game from `state` and returns its winner, `None` for a draw
    ///
    /// Every random choice must come from `rng` so that seeded searches are reproducible.
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<Option<S::Player>>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>>;
}

/// Random simulation policy
///
/// This policy plays uniformly random legal moves until the game ends.
#[derive(Debug, Clone)]
pub struct RandomPolicy;

impl RandomPolicy {
    /// Creates a new random policy
    pub fn new() -> Self {
        RandomPolicy
    }
}

impl Default for RandomPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GameState> SimulationPolicy<S> for RandomPolicy {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<Option<S::Player>> {
        state.simulate_random_playout(rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        Box::new(self.clone())
    }
}

// Implement SimulationPolicy for Box<dyn SimulationPolicy>
impl<S: GameState> SimulationPolicy<S> for Box<dyn SimulationPolicy<S>> {
    fn simulate(&self, state: &S, rng: &mut dyn RngCore) -> Result<Option<S::Player>> {
        (**self).simulate(state, rng)
    }

    fn clone_box(&self) -> Box<dyn SimulationPolicy<S>> {
        (**self).clone_box()
    }
}
