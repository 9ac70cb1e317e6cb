//! # uct-planner
//!
//! A Monte Carlo Tree Search (MCTS) move planner for finite, deterministic, two-player,
//! zero-sum combinatorial games.
//!
//! Given a position, the planner grows a search tree for a fixed budget of iterations and
//! recommends the move with the best estimated value for the player to move. Every call builds
//! a fresh tree; nothing is reused across moves.
//!
//! ## Features
//!
//! - Generic over any game that implements the [`GameState`] contract
//! - UCT selection with a single, root-wide exploration baseline
//! - Arena-backed search tree addressed by integer [`NodeId`]s
//! - Seedable randomness, so identical inputs and seeds produce identical trees
//! - Cooperative cancellation between iterations
//! - A read-only [`TreeSnapshot`] for external visualizers
//! - A separately named no-rollout engine, [`RecursiveMCTS`]
//!
//! ## Basic Usage
//!
//! ```
//! use uct_planner::{GameState, MCTSConfig, MCTSError, MCTS};
//!
//! #[derive(Clone, Debug, PartialEq, Eq)]
//! struct Take(u8);
//!
//! impl uct_planner::Action for Take {}
//!
//! // Players alternate taking one or two stones; whoever takes the last stone wins.
//! #[derive(Clone, Debug)]
//! struct Nim {
//!     stones: u8,
//!     to_move: usize,
//! }
//!
//! impl GameState for Nim {
//!     type Action = Take;
//!     type Player = usize;
//!
//!     fn get_legal_actions(&self) -> Vec<Take> {
//!         (1..=self.stones.min(2)).map(Take).collect()
//!     }
//!
//!     fn apply_action(&self, action: &Take) -> uct_planner::Result<Self> {
//!         if action.0 == 0 || action.0 > self.stones.min(2) {
//!             return Err(MCTSError::IllegalAction(format!("{:?}", action)));
//!         }
//!         Ok(Nim {
//!             stones: self.stones - action.0,
//!             to_move: 1 - self.to_move,
//!         })
//!     }
//!
//!     fn is_terminal(&self) -> bool {
//!         self.stones == 0
//!     }
//!
//!     fn get_winner(&self) -> Option<usize> {
//!         // The player who just moved took the last stone.
//!         self.is_terminal().then(|| 1 - self.to_move)
//!     }
//!
//!     fn get_current_player(&self) -> usize {
//!         self.to_move
//!     }
//! }
//!
//! fn main() -> Result<(), MCTSError> {
//!     let config = MCTSConfig::default()
//!         .with_budget(200)
//!         .with_max_depth(4)
//!         .with_seed(7);
//!
//!     let mut mcts = MCTS::new(Nim { stones: 2, to_move: 0 }, config);
//!     let best = mcts.search()?;
//!
//!     // Taking both stones wins on the spot.
//!     assert_eq!(best, Take(2));
//!     println!("{}", mcts.get_statistics().summary());
//!     Ok(())
//! }
//! ```
//!
//! ## How It Works
//!
//! Each iteration runs four phases against the node arena:
//!
//! 1. **Selection**: descend from the root by UCT until reaching a node without children.
//! 2. **Expansion**: if that node is not terminal, is shallower than `max_depth`, and is either
//!    the root or already visited, create all of its children at once and continue from one of
//!    them chosen uniformly at random.
//! 3. **Simulation**: play uniformly random legal moves until the game ends.
//! 4. **Backpropagation**: walk back to the root, crediting each node's mover with +1 for a win,
//!    -1 for a loss and nothing for a draw.
//!
//! After the budget is spent the root child with the highest mean value is recommended.

pub mod cancel;
pub mod config;
pub mod game_state;
pub mod mcts;
pub mod policy;
pub mod recursive;
pub mod snapshot;
pub mod stats;
pub mod tree;
pub mod utils;

pub use cancel::CancellationToken;
pub use config::MCTSConfig;
pub use game_state::{Action, GameState, Player};
pub use mcts::{plan, plan_with_seed, MCTS};
pub use policy::{BackpropagationPolicy, SelectionPolicy, SimulationPolicy};
pub use recursive::RecursiveMCTS;
pub use snapshot::{NodeSnapshot, TreeSnapshot};
pub use stats::SearchStatistics;
pub use tree::{MCTSNode, NodeId, SearchTree};

/// Error types for the MCTS algorithm
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MCTSError {
    /// An action was applied to a state in which it is not legal
    #[error("Illegal action: {0}")]
    IllegalAction(String),

    /// Expansion was attempted on a node that already has its children
    #[error("Node {0} has already been expanded")]
    AlreadyExpanded(NodeId),

    /// The position handed to the planner is already over
    #[error("Initial state is already terminal")]
    AlreadyTerminal,

    /// No legal actions are available from the current state
    #[error("No legal actions available from current state")]
    NoLegalActions,

    /// The search tree is structurally broken
    #[error("Tree invariant violated: {0}")]
    TreeInvariantViolation(String),

    /// Search was stopped before it could recommend a move
    #[error("Search stopped: {0}")]
    SearchStopped(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for MCTS operations
pub type Result<T> = std::result::Result<T, MCTSError>;
