use serde::Serialize;

use crate::errors::ModelError;
use crate::key::NodeKey;
use crate::node::NavigationNode;
use crate::node::NodeType;

/// Copyable handle into the tree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The navigation tree.
///
/// Owns every node; slot 0 is a synthetic top node that is never
/// rendered, so "top level" operations are ordinary child operations on
/// it. Detached subtrees keep their slots but become unreachable — the
/// tree lives for a single render, so slots are never recycled.
#[derive(Debug, Clone, Serialize)]
pub struct NavTree {
    nodes: Vec<NavigationNode>,
}

impl NavTree {
    #[must_use]
    pub fn new() -> Self {
        let top = NavigationNode::new(NodeKey::slug("root"), "", NodeType::System);
        Self { nodes: vec![top] }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `node` as the last child of `parent`.
    pub fn attach(
        &mut self,
        parent: NodeId,
        mut node: NavigationNode,
    ) -> Result<NodeId, ModelError> {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or_default());
        node.parent = Some(parent);
        let key = node.key().clone();
        self.nodes[parent.index()].children.insert(key, id)?;
        self.nodes.push(node);
        Ok(id)
    }

    /// Remove `id` from its parent's child collection.
    ///
    /// The subtree under `id` becomes unreachable; the top node cannot be
    /// detached.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.index()].parent else {
            return;
        };
        let key = self.nodes[id.index()].key().clone();
        self.nodes[parent.index()].children.remove(&key);
        self.nodes[id.index()].parent = None;
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &NavigationNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut NavigationNode {
        &mut self.nodes[id.index()]
    }

    #[must_use]
    pub fn child_by_key(&self, parent: NodeId, key: &NodeKey) -> Option<NodeId> {
        self.node(parent).children.get(key)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).children.iter()
    }

    /// Pre-order traversal of the subtree rooted at `start`, `start`
    /// included.
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![start],
        }
    }

    /// First node (pre-order from the top) matching `key` and `node_type`.
    #[must_use]
    pub fn find(&self, key: &NodeKey, node_type: NodeType) -> Option<NodeId> {
        self.descendants(self.root()).find(|id| {
            let node = self.node(*id);
            node.node_type() == node_type && node.key() == key
        })
    }

    #[must_use]
    pub fn find_all_of_type(&self, node_type: NodeType) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|id| self.node(*id).node_type() == node_type)
            .collect()
    }

    pub fn mark_active(&mut self, id: NodeId) {
        self.node_mut(id).set_active(true);
    }

    /// The active node, if construction marked one.
    #[must_use]
    pub fn active_node(&self) -> Option<NodeId> {
        self.descendants(self.root())
            .find(|id| self.node(*id).is_active())
    }

    /// Whether the subtree rooted at `id` (inclusive) holds the active
    /// node.
    #[must_use]
    pub fn contains_active(&self, id: NodeId) -> bool {
        self.descendants(id).any(|id| self.node(id).is_active())
    }

    /// Mark the first reachable node whose URL equals `url`.
    pub fn search_for_active(&mut self, url: &str) -> Option<NodeId> {
        self.search_for_active_from(self.root(), url)
    }

    /// Like [`Self::search_for_active`], scoped to the subtree rooted at
    /// `start`.
    pub fn search_for_active_from(&mut self, start: NodeId, url: &str) -> Option<NodeId> {
        let found = self
            .descendants(start)
            .find(|id| self.node(*id).url() == Some(url));
        if let Some(id) = found {
            self.mark_active(id);
        }
        found
    }

    /// Move every child of `from` to the front of the top level, then
    /// detach `from` itself. Used for the anonymous-viewer rewrite.
    pub fn hoist_children_to_front(&mut self, from: NodeId) -> Result<(), ModelError> {
        let entries = self.nodes[from.index()].children.take_entries();
        let root = self.root();
        for (_, id) in &entries {
            self.nodes[id.index()].parent = Some(root);
        }
        self.detach(from);
        self.nodes[root.index()].children.prepend(entries)
    }
}

impl Default for NavTree {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Descendants<'a> {
    tree: &'a NavTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        let children = &self.tree.node(next).children;
        let mut reversed: Vec<NodeId> = children.iter().collect();
        reversed.reverse();
        self.stack.extend(reversed);
        Some(next)
    }
}
