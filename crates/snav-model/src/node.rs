use serde::Serialize;

use crate::collection::NodeCollection;
use crate::key::NodeKey;
use crate::tree::NodeId;

/// The kind of content a node stands for.
///
/// Ranks order the kinds from structural to specific; the expansion-limit
/// threshold compares ranks, so the numbering is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    RootNode,
    System,
    Category,
    Course,
    Section,
    Activity,
    Setting,
    User,
}

impl NodeType {
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::RootNode => 0,
            Self::System => 1,
            Self::Category => 10,
            Self::Course => 20,
            Self::Section => 30,
            Self::Activity => 40,
            Self::Setting => 70,
            Self::User => 80,
        }
    }
}

/// A single entry in the navigation tree.
///
/// Nodes are created by the loaders and mutated in place (active flag,
/// children) until assembly completes; the presentation layer only ever
/// rewrites the display texts.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationNode {
    key: NodeKey,
    text: String,
    short_text: Option<String>,
    node_type: NodeType,
    url: Option<String>,
    is_active: bool,
    branch_id: Option<i64>,
    expandable: bool,
    pub(crate) children: NodeCollection,
    pub(crate) parent: Option<NodeId>,
}

impl NavigationNode {
    pub fn new(key: NodeKey, text: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            key,
            text: text.into(),
            short_text: None,
            node_type,
            url: None,
            is_active: false,
            branch_id: None,
            expandable: false,
            children: NodeCollection::default(),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_short_text(mut self, short_text: impl Into<String>) -> Self {
        self.short_text = Some(short_text.into());
        self
    }

    #[must_use]
    pub fn with_branch_id(mut self, branch_id: i64) -> Self {
        self.branch_id = Some(branch_id);
        self
    }

    #[must_use]
    pub fn expandable(mut self, expandable: bool) -> Self {
        self.expandable = expandable;
        self
    }

    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub fn short_text(&self) -> Option<&str> {
        self.short_text.as_deref()
    }

    pub fn set_short_text(&mut self, short_text: String) {
        self.short_text = Some(short_text);
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn branch_id(&self) -> Option<i64> {
        self.branch_id
    }

    pub fn is_expandable(&self) -> bool {
        self.expandable
    }

    pub fn children(&self) -> &NodeCollection {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
