//! Scene hierarchy access.
//!
//! Screens live on nodes of the host's scene graph. The `Hierarchy` trait is
//! the slice of that graph this crate needs: parent/child lookup, node names
//! and activation. `SceneTree` is a small in-memory implementation used by
//! the headless driver and the tests.

use thiserror::Error;

/// Handle to a node in the host hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw index of the node.
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while editing a `SceneTree`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The node does not belong to this tree
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    /// Reparenting would create a cycle
    #[error("Cannot move node {node} under {parent}: parent is inside its subtree")]
    CyclicParent {
        /// The node being moved
        node: NodeId,
        /// The requested parent
        parent: NodeId,
    },
}

/// Read/activate access to the host scene graph.
pub trait Hierarchy {
    /// Parent of `node`, or `None` for a root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Immediate children of `node`, in order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Display name of `node`.
    fn name(&self, node: NodeId) -> Option<&str>;

    /// Activate or deactivate `node`.
    fn set_active(&mut self, node: NodeId, active: bool);

    /// Whether `node` is active.
    fn is_active(&self, node: NodeId) -> bool;

    /// Whether `node` is `ancestor` or sits somewhere below it.
    fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

#[derive(Debug, Clone)]
struct Node {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    active: bool,
}

/// In-memory scene graph.
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    nodes: Vec<Node>,
}

impl SceneTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node. New nodes start active.
    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        self.push(name.into(), None)
    }

    /// Add a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> Result<NodeId, SceneError> {
        self.check(parent)?;
        let id = self.push(name.into(), Some(parent));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Move `node` under `new_parent` (or make it a root).
    pub fn reparent(&mut self, node: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError> {
        self.check(node)?;
        if let Some(parent) = new_parent {
            self.check(parent)?;
            if self.is_descendant_of(parent, node) {
                return Err(SceneError::CyclicParent { node, parent });
            }
        }

        if let Some(old) = self.nodes[node.0].parent {
            self.nodes[old.0].children.retain(|c| *c != node);
        }
        self.nodes[node.0].parent = new_parent;
        if let Some(parent) = new_parent {
            self.nodes[parent.0].children.push(node);
        }
        Ok(())
    }

    /// First node with the given name, in creation order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .map(NodeId)
    }

    /// First node named `name` inside the subtree rooted at `root`.
    pub fn find_in(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i), n))
            .find(|(id, n)| n.name == name && self.is_descendant_of(*id, root))
            .map(|(id, _)| id)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, name: String, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            parent,
            children: Vec::new(),
            active: true,
        });
        id
    }

    fn check(&self, node: NodeId) -> Result<(), SceneError> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownNode(node))
        }
    }
}

impl Hierarchy for SceneTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.name.as_str())
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.active = active;
        }
    }

    fn is_active(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.active)
    }
}
