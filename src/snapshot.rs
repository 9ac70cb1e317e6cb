//! Read-only tree snapshots
//!
//! A [`TreeSnapshot`] copies the statistics and links of every node out of a
//! [`SearchTree`](crate::SearchTree) so that an external visualizer can inspect a search
//! without holding a borrow on the planner. The crate does not render or serialize it.

use std::collections::BTreeMap;

use crate::{tree::NodeId, MCTSError, Result};

/// Copy of one node's statistics and links
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot<P> {
    /// Node id
    pub id: NodeId,
    /// Depth (root = 0)
    pub depth: usize,
    /// Visit count
    pub visits: u64,
    /// Accumulated reward
    pub reward: f64,
    /// Value, negative infinity while unvisited
    pub value: f64,
    /// Player to move at the node
    pub player: P,
    /// Player whose action produced the node
    pub mover: P,
    /// Parent id (None for root)
    pub parent: Option<NodeId>,
    /// Child ids in creation order
    pub children: Vec<NodeId>,
    /// Debug rendering of the action that produced the node
    pub action_label: Option<String>,
}

/// Ordered map from node id to node snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct TreeSnapshot<P> {
    nodes: BTreeMap<NodeId, NodeSnapshot<P>>,
}

impl<P: PartialEq> TreeSnapshot<P> {
    /// Builds a snapshot from node copies, keyed by their ids
    pub fn from_nodes<I: IntoIterator<Item = NodeSnapshot<P>>>(nodes: I) -> Self {
        TreeSnapshot {
            nodes: nodes.into_iter().map(|node| (node.id, node)).collect(),
        }
    }

    /// Returns the snapshot of one node
    pub fn get(&self, id: NodeId) -> Option<&NodeSnapshot<P>> {
        self.nodes.get(&id)
    }

    /// Returns the root snapshot
    pub fn root(&self) -> Option<&NodeSnapshot<P>> {
        self.get(NodeId::ROOT)
    }

    /// Number of nodes captured
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if no nodes were captured
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over node snapshots in id order
    pub fn iter(&self) -> impl Iterator<Item = &NodeSnapshot<P>> {
        self.nodes.values()
    }

    /// Iterates over the snapshots of nodes at `depth`
    pub fn at_depth(&self, depth: usize) -> impl Iterator<Item = &NodeSnapshot<P>> {
        self.nodes.values().filter(move |node| node.depth == depth)
    }

    /// Checks the structural invariants of a finished or paused search
    ///
    /// * the root has id 0, depth 0 and no parent
    /// * every other node sits one level below an existing parent that lists it as a child
    /// * every listed child points back at its parent
    /// * a node's value is negative infinity exactly when it has no visits
    pub fn check_invariants(&self) -> Result<()> {
        let root = self.root().ok_or_else(|| violation("snapshot has no root".to_string()))?;
        if root.depth != 0 || root.parent.is_some() {
            return Err(violation(format!(
                "root has depth {} and parent {:?}",
                root.depth, root.parent
            )));
        }

        for node in self.nodes.values() {
            if let Some(parent_id) = node.parent {
                let parent = self.get(parent_id).ok_or_else(|| {
                    violation(format!("node {} has dangling parent {}", node.id, parent_id))
                })?;
                if parent.depth + 1 != node.depth {
                    return Err(violation(format!(
                        "node {} at depth {} under parent at depth {}",
                        node.id, node.depth, parent.depth
                    )));
                }
                if !parent.children.contains(&node.id) {
                    return Err(violation(format!(
                        "parent {} does not list child {}",
                        parent_id, node.id
                    )));
                }
            } else if node.id != NodeId::ROOT {
                return Err(violation(format!("non-root node {} has no parent", node.id)));
            }

            for child_id in &node.children {
                let child = self.get(*child_id).ok_or_else(|| {
                    violation(format!("node {} has dangling child {}", node.id, child_id))
                })?;
                if child.parent != Some(node.id) {
                    return Err(violation(format!(
                        "child {} does not point back at {}",
                        child_id, node.id
                    )));
                }
            }

            let undefined = node.value == f64::NEG_INFINITY;
            if undefined != (node.visits == 0) {
                return Err(violation(format!(
                    "node {} has {} visits but value {}",
                    node.id, node.visits, node.value
                )));
            }
        }

        Ok(())
    }
}

fn violation(message: String) -> MCTSError {
    MCTSError::TreeInvariantViolation(message)
}
