//! Policies for the phases of the MCTS algorithm
//!
//! - Selection policies: which child to descend into
//! - Simulation policies: how to play a game out from the frontier
//! - Backpropagation policies: how a simulation's winner updates node statistics

pub mod backpropagation;
pub mod selection;
pub mod simulation;

pub use backpropagation::{BackpropagationPolicy, StandardPolicy};
pub use selection::{SelectionPolicy, UCTPolicy};
pub use simulation::{RandomPolicy, SimulationPolicy};
