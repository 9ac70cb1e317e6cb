//! Selection policies for the MCTS algorithm
//!
//! A selection policy picks which child to descend into while walking from the root
//! towards the frontier.

use crate::{
    game_state::GameState,
    tree::{NodeId, SearchTree},
    utils::{first_max_index, uct_value},
    Result,
};

/// Trait for policies that select nodes to explore
pub trait SelectionPolicy<S: GameState> {
    /// Picks a child of `node_id`, or `None` if it has no children
    fn select_child(&self, tree: &SearchTree<S>, node_id: NodeId) -> Result<Option<NodeId>>;

    /// Create a boxed clone of this policy
    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>>;
}

/// Upper Confidence bound applied to Trees (UCT)
///
/// ```text
/// UCT = +inf                                              if child_visits == 0
///     = child_value + c * sqrt(ln(root_visits) / child_visits)   otherwise
/// ```
///
/// The exploration baseline is the root's visit count at every level of the tree, not the
/// immediate parent's. Ties go to the first child in creation order.
#[derive(Debug, Clone)]
pub struct UCTPolicy {
    /// Exploration constant that controls the balance between exploration and exploitation.
    pub exploration_constant: f64,
}

impl UCTPolicy {
    /// Creates a new UCT policy with the given exploration constant
    pub fn new(exploration_constant: f64) -> Self {
        UCTPolicy {
            exploration_constant,
        }
    }

    /// Calculates the UCT score of a child
    pub fn uct_value(&self, child_value: f64, child_visits: u64, root_visits: u64) -> f64 {
        uct_value(
            child_value,
            child_visits,
            root_visits,
            self.exploration_constant,
        )
    }
}

impl Default for UCTPolicy {
    fn default() -> Self {
        Self::new(1.414)
    }
}

impl<S: GameState> SelectionPolicy<S> for UCTPolicy {
    fn select_child(&self, tree: &SearchTree<S>, node_id: NodeId) -> Result<Option<NodeId>> {
        let root_visits = tree.root_node().visits();
        let children = tree.children_of(node_id)?;

        let scores = children
            .iter()
            .map(|&child_id| {
                let child = tree.get(child_id)?;
                Ok(self.uct_value(child.value(), child.visits(), root_visits))
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(first_max_index(scores).map(|i| children[i]))
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>> {
        Box::new(self.clone())
    }
}

// Implement SelectionPolicy for Box<dyn SelectionPolicy>
impl<S: GameState> SelectionPolicy<S> for Box<dyn SelectionPolicy<S>> {
    fn select_child(&self, tree: &SearchTree<S>, node_id: NodeId) -> Result<Option<NodeId>> {
        (**self).select_child(tree, node_id)
    }

    fn clone_box(&self) -> Box<dyn SelectionPolicy<S>> {
        (**self).clone_box()
    }
}
