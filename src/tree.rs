//! Tree data structures for Monte Carlo Tree Search
//!
//! The search tree is an arena: every node lives in one `Vec` owned by [`SearchTree`] and
//! refers to its parent and children by [`NodeId`]. Nodes never own each other, so there
//! are no ownership cycles and no node outlives the tree.

use std::fmt;

use log::trace;

use crate::{
    game_state::GameState,
    snapshot::{NodeSnapshot, TreeSnapshot},
    utils::{first_max_index, UNVISITED_VALUE},
    MCTSError, Result,
};

/// Index of a node in the search tree arena
///
/// Ids are assigned in creation order; the root is always `NodeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Id of the root node
    pub const ROOT: NodeId = NodeId(0);

    /// Returns the arena index of this id
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Represents a node in the MCTS tree
///
/// Each node owns the game state it stands for, the action that produced it and the
/// statistics gathered by backpropagation.
#[derive(Debug, Clone)]
pub struct MCTSNode<S: GameState> {
    /// Id of this node in the arena
    pub id: NodeId,

    /// Depth of this node in the tree (root = 0)
    pub depth: usize,

    /// The game state at this node
    pub state: S,

    /// The action that led to this state (None for root)
    pub action: Option<S::Action>,

    /// Player to move at this node
    pub player: S::Player,

    /// Player whose action produced this node
    ///
    /// Rewards are credited to this player. For the root it is the player to move.
    pub mover: S::Player,

    /// Parent node (None for root)
    pub parent: Option<NodeId>,

    /// Children in creation order, empty until the node is expanded
    pub children: Vec<NodeId>,

    expanded: bool,
    visits: u64,
    reward: f64,
    value: f64,
}

impl<S: GameState> MCTSNode<S> {
    fn new(
        id: NodeId,
        state: S,
        action: Option<S::Action>,
        mover: Option<S::Player>,
        parent: Option<NodeId>,
        depth: usize,
    ) -> Self {
        let player = state.get_current_player();
        let mover = mover.unwrap_or_else(|| player.clone());

        MCTSNode {
            id,
            depth,
            state,
            action,
            player,
            mover,
            parent,
            children: Vec::new(),
            expanded: false,
            visits: 0,
            reward: 0.0,
            value: UNVISITED_VALUE,
        }
    }

    /// Returns the number of completed iterations that passed through this node
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Returns the total reward accumulated at this node
    pub fn reward(&self) -> f64 {
        self.reward
    }

    /// Returns the value of this node
    ///
    /// Negative infinity until the node has been visited.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns true once backpropagation has reached this node
    pub fn is_visited(&self) -> bool {
        self.visits > 0
    }

    /// Returns true once children have been generated for this node
    ///
    /// A node whose state has no legal actions can be expanded and still have no children.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Returns true if this node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Records one visit carrying `reward`, keeping `value` at the mean reward
    pub fn record(&mut self, reward: f64) {
        self.visits += 1;
        self.reward += reward;
        self.value = self.reward / self.visits as f64;
    }

    /// Records one visit carrying a backed-up value `q`, keeping `value` at the best `q` seen
    pub fn record_backup(&mut self, q: f64) {
        self.visits += 1;
        self.reward += q;
        self.value = self.value.max(q);
    }
}

/// Arena holding every node of one search
#[derive(Debug, Clone)]
pub struct SearchTree<S: GameState> {
    nodes: Vec<MCTSNode<S>>,
}

impl<S: GameState> SearchTree<S> {
    /// Creates a tree holding only a root node for `state`
    pub fn new(state: S) -> Self {
        let root = MCTSNode::new(NodeId::ROOT, state, None, None, None, 0);
        SearchTree { nodes: vec![root] }
    }

    /// Returns the root node id
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Returns the root node
    pub fn root_node(&self) -> &MCTSNode<S> {
        &self.nodes[0]
    }

    /// Returns the number of nodes in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a node by id
    pub fn get(&self, id: NodeId) -> Result<&MCTSNode<S>> {
        self.nodes.get(id.index()).ok_or_else(|| dangling(id))
    }

    /// Returns a mutable node by id
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut MCTSNode<S>> {
        self.nodes.get_mut(id.index()).ok_or_else(|| dangling(id))
    }

    /// Returns the children of a node, empty before expansion
    pub fn children_of(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(id)?.children)
    }

    /// Iterates over all nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = &MCTSNode<S>> {
        self.nodes.iter()
    }

    /// Creates one child per legal action of `id`'s state
    ///
    /// The children are built first and attached in a single step, so a failing
    /// [`apply_action`](GameState::apply_action) leaves the node untouched.
    ///
    /// # Errors
    ///
    /// * [`MCTSError::AlreadyExpanded`] - the node was expanded before
    /// * [`MCTSError::TreeInvariantViolation`] - the node's state is terminal
    /// * [`MCTSError::IllegalAction`] - the game rejected one of its own legal actions
    pub fn expand(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let parent = self.get(id)?;
        if parent.expanded || !parent.children.is_empty() {
            return Err(MCTSError::AlreadyExpanded(id));
        }
        if parent.state.is_terminal() {
            return Err(MCTSError::TreeInvariantViolation(format!(
                "cannot expand terminal node {}",
                id
            )));
        }

        let depth = parent.depth + 1;
        let first_id = self.nodes.len();
        let mut children = Vec::new();
        for (offset, action) in parent.state.get_legal_actions().into_iter().enumerate() {
            let state = parent.state.apply_action(&action)?;
            children.push(MCTSNode::new(
                NodeId(first_id + offset),
                state,
                Some(action),
                Some(parent.player.clone()),
                Some(id),
                depth,
            ));
        }

        let child_ids: Vec<NodeId> = children.iter().map(|child| child.id).collect();
        self.nodes.extend(children);

        let parent = &mut self.nodes[id.index()];
        parent.children = child_ids.clone();
        parent.expanded = true;

        trace!("expanded node {} into {} children", id, child_ids.len());
        Ok(child_ids)
    }

    /// Returns the child of `id` with the highest value
    ///
    /// Ties go to the earliest child in creation order. `None` if `id` has no children.
    pub fn best_child_by_value(&self, id: NodeId) -> Result<Option<NodeId>> {
        let children = self.children_of(id)?;
        let values = children
            .iter()
            .map(|&child| self.get(child).map(|node| node.value()))
            .collect::<Result<Vec<f64>>>()?;

        Ok(first_max_index(values).map(|i| children[i]))
    }

    /// Returns the parent of `id`, checking that depths line up
    pub fn parent_of(&self, id: NodeId) -> Result<Option<NodeId>> {
        let node = self.get(id)?;
        let Some(parent_id) = node.parent else {
            return Ok(None);
        };
        let parent = self.get(parent_id)?;
        if parent.depth + 1 != node.depth {
            return Err(MCTSError::TreeInvariantViolation(format!(
                "node {} at depth {} has parent {} at depth {}",
                id, node.depth, parent_id, parent.depth
            )));
        }
        Ok(Some(parent_id))
    }

    /// Builds a read-only view of the whole tree
    pub fn snapshot(&self) -> TreeSnapshot<S::Player> {
        TreeSnapshot::from_nodes(self.nodes.iter().map(|node| NodeSnapshot {
            id: node.id,
            depth: node.depth,
            visits: node.visits,
            reward: node.reward,
            value: node.value,
            player: node.player.clone(),
            mover: node.mover.clone(),
            parent: node.parent,
            children: node.children.clone(),
            action_label: node.action.as_ref().map(|action| format!("{:?}", action)),
        }))
    }
}

fn dangling(id: NodeId) -> MCTSError {
    MCTSError::TreeInvariantViolation(format!("node {} does not exist", id))
}
