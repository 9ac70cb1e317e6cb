//! Main implementation of the Monte Carlo Tree Search algorithm
//!
//! This module contains the rollout planner, orchestrating the four phases of
//! selection, expansion, simulation, and backpropagation over a fixed budget.

use std::time::Instant;

use log::{debug, info, trace};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::{
    cancel::CancellationToken,
    config::MCTSConfig,
    game_state::GameState,
    policy::{
        backpropagation::{BackpropagationPolicy, StandardPolicy},
        selection::{SelectionPolicy, UCTPolicy},
        simulation::{RandomPolicy, SimulationPolicy},
    },
    snapshot::TreeSnapshot,
    stats::SearchStatistics,
    tree::{NodeId, SearchTree},
    MCTSError, Result,
};

/// Plans one move from `initial_state` with a freshly built tree
///
/// Randomness is seeded from the operating system; use [`plan_with_seed`] for
/// reproducible results.
pub fn plan<S: GameState + 'static>(
    initial_state: S,
    budget: usize,
    exploration_constant: f64,
    max_depth: usize,
) -> Result<S::Action> {
    let config = MCTSConfig::default()
        .with_budget(budget)
        .with_exploration_constant(exploration_constant)
        .with_max_depth(max_depth);

    MCTS::new(initial_state, config).search()
}

/// Like [`plan`], drawing every random choice from a generator seeded with `seed`
pub fn plan_with_seed<S: GameState + 'static>(
    initial_state: S,
    budget: usize,
    exploration_constant: f64,
    max_depth: usize,
    seed: u64,
) -> Result<S::Action> {
    let config = MCTSConfig::default()
        .with_budget(budget)
        .with_exploration_constant(exploration_constant)
        .with_max_depth(max_depth)
        .with_seed(seed);

    MCTS::new(initial_state, config).search()
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    }
}

/// The rollout Monte Carlo Tree Search planner
///
/// Holds the search tree, the phase policies and the random generator for one position.
/// Every call to [`search`](MCTS::search) discards the previous tree and starts over
/// from the initial state.
pub struct MCTS<S: GameState> {
    /// The search tree
    tree: SearchTree<S>,

    /// Configuration for the search
    config: MCTSConfig,

    /// Statistics gathered during search
    statistics: SearchStatistics,

    /// Policy for selecting nodes during the selection phase
    selection_policy: Box<dyn SelectionPolicy<S>>,

    /// Policy for simulating games during the simulation phase
    simulation_policy: Box<dyn SimulationPolicy<S>>,

    /// Policy for backpropagating results
    backpropagation_policy: Box<dyn BackpropagationPolicy<S>>,

    /// Source of every random choice
    rng: ChaCha20Rng,

    /// Checked between iterations
    cancellation: Option<CancellationToken>,
}

impl<S: GameState + 'static> MCTS<S> {
    /// Creates a new MCTS instance with the given initial state and configuration
    pub fn new(initial_state: S, config: MCTSConfig) -> Self {
        let selection_policy: Box<dyn SelectionPolicy<S>> =
            Box::new(UCTPolicy::new(config.exploration_constant));

        let simulation_policy: Box<dyn SimulationPolicy<S>> = Box::new(RandomPolicy::new());

        let backpropagation_policy: Box<dyn BackpropagationPolicy<S>> =
            Box::new(StandardPolicy::new());

        MCTS {
            tree: SearchTree::new(initial_state),
            rng: seeded_rng(config.seed),
            statistics: SearchStatistics::new(config.budget),
            config,
            selection_policy,
            simulation_policy,
            backpropagation_policy,
            cancellation: None,
        }
    }

    /// Sets the selection policy to use
    pub fn with_selection_policy<P: SelectionPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.selection_policy = Box::new(policy);
        self
    }

    /// Sets the simulation policy to use
    pub fn with_simulation_policy<P: SimulationPolicy<S> + 'static>(mut self, policy: P) -> Self {
        self.simulation_policy = Box::new(policy);
        self
    }

    /// Sets the backpropagation policy to use
    pub fn with_backpropagation_policy<P: BackpropagationPolicy<S> + 'static>(
        mut self,
        policy: P,
    ) -> Self {
        self.backpropagation_policy = Box::new(policy);
        self
    }

    /// Lets `token` stop the search between iterations
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Runs the full budget and returns the recommended action
    ///
    /// # Errors
    ///
    /// * [`MCTSError::InvalidConfiguration`] - the configuration failed validation
    /// * [`MCTSError::AlreadyTerminal`] - the initial state is already over
    /// * [`MCTSError::NoLegalActions`] - the root never acquired children
    /// * [`MCTSError::SearchStopped`] - cancelled before the first iteration finished
    /// * any error raised by the game or the tree during an iteration
    pub fn search(&mut self) -> Result<S::Action> {
        self.config.validate()?;
        self.reset();

        if self.tree.root_node().state.is_terminal() {
            return Err(MCTSError::AlreadyTerminal);
        }

        debug!(
            "starting search: budget {}, exploration constant {}, max depth {}",
            self.config.budget, self.config.exploration_constant, self.config.max_depth
        );

        let start_time = Instant::now();
        for i in 0..self.config.budget {
            if self.is_cancelled() {
                self.statistics.stopped_early = true;
                info!("search cancelled after {} of {} iterations", i, self.config.budget);
                break;
            }

            self.execute_iteration()?;
            self.statistics.iterations = i + 1;
        }

        self.statistics.total_time = start_time.elapsed();
        self.statistics.tree_size = self.tree.len();
        debug!(
            "search finished: {} iterations, {} nodes in {:?}",
            self.statistics.iterations, self.statistics.tree_size, self.statistics.total_time
        );

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

    /// Returns the configuration
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    fn reset(&mut self) {
        if self.tree.len() > 1 || self.tree.root_node().is_visited() {
            self.tree = SearchTree::new(self.tree.root_node().state.clone());
        }
        self.rng = seeded_rng(self.config.seed);
        self.statistics = SearchStatistics::new(self.config.budget);
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Execute a single iteration of the MCTS algorithm
    fn execute_iteration(&mut self) -> Result<()> {
        // 1. Selection phase
        let leaf = self.selection()?;

        // 2. Expansion phase
        let frontier = self.expansion(leaf)?;

        // 3. Simulation phase
        let winner = self.simulation(frontier)?;

        // 4. Backpropagation phase
        self.backpropagation(frontier, winner.as_ref())
    }

    /// Selection phase: descend by the selection policy until a node without children
    fn selection(&mut self) -> Result<NodeId> {
        let mut current = self.tree.root();

        while !self.tree.children_of(current)?.is_empty() {
            current = self
                .selection_policy
                .select_child(&self.tree, current)?
                .ok_or_else(|| {
                    MCTSError::TreeInvariantViolation(format!(
                        "no child selected below expanded node {}",
                        current
                    ))
                })?;

            let depth = self.tree.get(current)?.depth;
            self.statistics.max_depth = self.statistics.max_depth.max(depth);
        }

        Ok(current)
    }

    /// Expansion phase: grow the frontier node and pick one new child at random
    ///
    /// Only the root and previously visited nodes are expanded, and never at `max_depth`.
    /// Otherwise the frontier node itself is simulated.
    fn expansion(&mut self, leaf: NodeId) -> Result<NodeId> {
        let node = self.tree.get(leaf)?;
        let expandable = !node.state.is_terminal()
            && !node.is_expanded()
            && node.depth < self.config.max_depth
            && (leaf == self.tree.root() || node.is_visited());

        if !expandable {
            return Ok(leaf);
        }

        let children = self.tree.expand(leaf)?;
        self.statistics.expansions += 1;

        Ok(children.choose(&mut self.rng).copied().unwrap_or(leaf))
    }

    /// Simulation phase: play out the game from the frontier node
    fn simulation(&mut self, frontier: NodeId) -> Result<Option<S::Player>> {
        let state = &self.tree.get(frontier)?.state;
        self.simulation_policy.simulate(state, &mut self.rng)
    }

    /// Backpropagation phase: update every node from the frontier up to the root
    fn backpropagation(&mut self, frontier: NodeId, winner: Option<&S::Player>) -> Result<()> {
        let mut current = Some(frontier);

        while let Some(id) = current {
            let parent = self.tree.parent_of(id)?;
            let node = self.tree.get_mut(id)?;
            self.backpropagation_policy.update_stats(node, winner);
            current = parent;
        }

        trace!("backpropagated winner {:?} from node {}", winner, frontier);
        Ok(())
    }
}

/// Picks the action of the root child with the highest value
///
/// Shared by both engines. Ties go to the first child in creation order.
pub(crate) fn recommend<S: GameState>(
    tree: &SearchTree<S>,
    statistics: &mut SearchStatistics,
) -> Result<S::Action> {
    let root = tree.root();

    for &child_id in tree.children_of(root)? {
        let child = tree.get(child_id)?;
        debug!(
            "root child {} {:?}: visits {}, reward {}, value {:.3}",
            child_id,
            child.action,
            child.visits(),
            child.reward(),
            child.value()
        );
    }

    match tree.best_child_by_value(root)? {
        Some(best) => {
            let node = tree.get(best)?;
            statistics.best_value = Some(node.value());
            node.action.clone().ok_or_else(|| {
                MCTSError::TreeInvariantViolation(format!("child {} has no action", best))
            })
        }
        None if statistics.stopped_early && statistics.iterations == 0 => Err(
            MCTSError::SearchStopped("cancelled before the first iteration".to_string()),
        ),
        None => Err(MCTSError::NoLegalActions),
    }
}
