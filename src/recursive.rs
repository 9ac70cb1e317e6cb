//! Recursive-backup search without rollouts
//!
//! [`RecursiveMCTS`] shares the tree and UCT selection with [`MCTS`](crate::MCTS) but never
//! plays random games. Each iteration descends from the root until it hits a finished game
//! or the depth limit, and the outcome found there is discounted and backed up through
//! every node on the way. A node keeps the best value ever backed up into it, so the engine
//! converges differently from the mean-reward rollout planner and is kept as its own type.

use std::time::Instant;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha20Rng;

use crate::{
    cancel::CancellationToken,
    config::MCTSConfig,
    game_state::GameState,
    mcts::{recommend, seeded_rng},
    policy::selection::{SelectionPolicy, UCTPolicy},
    snapshot::TreeSnapshot,
    stats::SearchStatistics,
    tree::{NodeId, SearchTree},
    utils::credit,
    MCTSError, Result,
};

/// Monte Carlo Tree Search with recursive value backup instead of rollouts
///
/// * A terminal node is worth +1, -1 or 0 to its mover.
/// * A node at `max_depth` is worth 0 and is left untouched.
/// * Any other node continues into a child: a uniformly random new child right after
///   expansion, the UCT choice afterwards. The child's value, negated when the child's mover
///   is the opponent and multiplied by `discount`, becomes this node's backed-up value.
///
/// # Example
///
/// ```
/// use uct_planner::{GameState, MCTSConfig, MCTSError, RecursiveMCTS};
///
/// #[derive(Clone, Debug)]
/// struct Race { left: u8, to_move: usize }
///
/// impl GameState for Race {
///     type Action = u8;
///     type Player = usize;
///     fn get_legal_actions(&self) -> Vec<u8> { (1..=self.left.min(2)).collect() }
///     fn apply_action(&self, step: &u8) -> uct_planner::Result<Self> {
///         if !self.is_legal_action(step) {
///             return Err(MCTSError::IllegalAction(format!("{}", step)));
///         }
///         Ok(Race { left: self.left - step, to_move: 1 - self.to_move })
///     }
///     fn is_terminal(&self) -> bool { self.left == 0 }
///     fn get_winner(&self) -> Option<usize> { self.is_terminal().then(|| 1 - self.to_move) }
///     fn get_current_player(&self) -> usize { self.to_move }
/// }
///
/// let config = MCTSConfig::default().with_budget(100).with_seed(3);
/// let mut engine = RecursiveMCTS::new(Race { left: 2, to_move: 0 }, config);
/// assert_eq!(engine.search().unwrap(), 2);
/// ```
pub struct RecursiveMCTS<S: GameState> {
    tree: SearchTree<S>,
    config: MCTSConfig,
    statistics: SearchStatistics,
    selection_policy: Box<dyn SelectionPolicy<S>>,
    rng: ChaCha20Rng,
    cancellation: Option<CancellationToken>,
}

impl<S: GameState + 'static> RecursiveMCTS<S> {
    /// Creates a new engine for `initial_state`
    pub fn new(initial_state: S, config: MCTSConfig) -> Self {
        let selection_policy: Box<dyn SelectionPolicy<S>> =
            Box::new(UCTPolicy::new(config.exploration_constant));

        RecursiveMCTS {
            tree: SearchTree::new(initial_state),
            rng: seeded_rng(config.seed),
            statistics: SearchStatistics::new(config.budget),
            config,
            selection_policy,
            cancellation: None,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Lets `token` stop the search between iterations
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Runs the full budget and returns the root child with the best backed-up value
    ///
    /// Fails the same way as [`MCTS::search`](crate::MCTS::search).
    pub fn search(&mut self) -> Result<S::Action> {
        self.config.validate()?;
        if self.tree.len() > 1 || self.tree.root_node().is_visited() {
            self.tree = SearchTree::new(self.tree.root_node().state.clone());
        }
        self.rng = seeded_rng(self.config.seed);
        self.statistics = SearchStatistics::new(self.config.budget);

        if self.tree.root_node().state.is_terminal() {
            return Err(MCTSError::AlreadyTerminal);
        }

        debug!(
            "starting recursive search: budget {}, discount {}, max depth {}",
            self.config.budget, self.config.discount, self.config.max_depth
        );

        let start_time = Instant::now();
        for i in 0..self.config.budget {
            if self.cancellation.as_ref().is_some_and(|token| token.is_cancelled()) {
                self.statistics.stopped_early = true;
                info!("recursive search cancelled after {} iterations", i);
                break;
            }

            let root = self.tree.root();
            self.search_node(root)?;
            self.statistics.iterations = i + 1;
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = self.tree.len();

        recommend(&self.tree, &mut self.statistics)
    }

    /// Returns the search tree
    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// Returns a read-only copy of the tree's statistics and links
    pub fn snapshot(&self) -> TreeSnapshot<S::Player> {
        self.tree.snapshot()
    }

    /// Returns the search statistics
    pub fn get_statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Descends from `id` and returns its backed-up value, seen from its mover
    fn search_node(&mut self, id: NodeId) -> Result<f64> {
        let node = self.tree.get(id)?;

        if node.state.is_terminal() {
            let q = credit(&node.mover, node.state.get_winner().as_ref());
            self.tree.get_mut(id)?.record_backup(q);
            return Ok(q);
        }

        if node.depth >= self.config.max_depth {
            return Ok(0.0);
        }

        let next = if node.is_expanded() {
            self.selection_policy.select_child(&self.tree, id)?
        } else {
            let children = self.tree.expand(id)?;
            self.statistics.expansions += 1;
            children.choose(&mut self.rng).copied()
        };

        // No legal moves in a live position scores as a draw.
        let Some(child_id) = next else {
            self.tree.get_mut(id)?.record_backup(0.0);
            return Ok(0.0);
        };

        let child_depth = self.tree.get(child_id)?.depth;
        self.statistics.max_depth = self.statistics.max_depth.max(child_depth);

        let child_q = self.search_node(child_id)?;
        let same_side = self.tree.get(child_id)?.mover == self.tree.get(id)?.mover;
        let q = self.config.discount * if same_side { child_q } else { -child_q };

        self.tree.get_mut(id)?.record_backup(q);
        Ok(q)
    }
}
