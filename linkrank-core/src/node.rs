use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// Dense integer identity of a node, handed out in first-seen order
pub type NodeId = usize;

/// A node of the link graph: its id and the label (URL) it was read as.
///
/// Nodes compare by id only; two nodes with the same id are the same node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    label: String,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

// [ID]URL
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]{}", self.id, self.label)
    }
}

/// Two-way mapping between labels and dense node ids.
///
/// Ids are assigned sequentially, so every id in `0..len()` is always present.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    nodes: Vec<Node>,
    by_label: HashMap<String, NodeId>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `label`, issuing the next id if the label is new.
    /// The boolean is true when a node was created.
    pub fn get_or_insert(&mut self, label: &str) -> (NodeId, bool) {
        if let Some(&id) = self.by_label.get(label) {
            return (id, false);
        }

        let id = self.nodes.len();
        self.nodes.push(Node::new(id, label));
        self.by_label.insert(label.to_string(), id);
        (id, true)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn id_of(&self, label: &str) -> Option<NodeId> {
        self.by_label.get(label).copied()
    }

    pub fn label_of(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(Node::label)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in id order
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl<'a> IntoIterator for &'a NodeTable {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
