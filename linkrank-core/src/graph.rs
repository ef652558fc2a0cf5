// Link graph store: node identity plus forward/backward adjacency

use crate::defaults::DEFAULT_GROWTH_RATE;
use crate::error::{RankError, Result};
use crate::node::{Node, NodeId, NodeTable};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, trace, warn};

/// Outbound edges of a node: neighbor id -> edge weight, ordered by id
pub type Neighbors = BTreeMap<NodeId, f64>;

/// Inbound edges of a node: the set of predecessor ids
pub type Predecessors = BTreeSet<NodeId>;

/// What `Graph::add_edge` did with an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// New edge recorded
    Added,
    /// Source and destination are the same node, ignored
    SelfLoop,
    /// Edge already present, ignored
    Duplicate,
}

/// Directed link graph built by repeated edge insertion.
///
/// Node ids index directly into the adjacency vectors. Both vectors are
/// grown `growth_rate` slots at a time, so every id below `num_nodes()` always
/// has a slot.
#[derive(Debug, Clone)]
pub struct Graph {
    growth_rate: usize,
    num_edges: usize,
    nodes: NodeTable,
    forward: Vec<Neighbors>,
    backward: Vec<Predecessors>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph using `DEFAULT_GROWTH_RATE`
    pub fn new() -> Self {
        Self::build(DEFAULT_GROWTH_RATE)
    }

    /// Creates an empty graph whose adjacency storage grows `growth_rate`
    /// slots at a time. A zero growth rate is rejected.
    pub fn with_growth_rate(growth_rate: usize) -> Result<Self> {
        if growth_rate == 0 {
            return Err(RankError::ZeroGrowthRate);
        }
        Ok(Self::build(growth_rate))
    }

    fn build(growth_rate: usize) -> Self {
        Self {
            growth_rate,
            num_edges: 0,
            nodes: NodeTable::new(),
            forward: Vec::new(),
            backward: Vec::new(),
        }
    }

    /// Returns the id of `label`, creating a new node if it was never seen
    pub fn get_or_create_id(&mut self, label: &str) -> NodeId {
        let (id, created) = self.nodes.get_or_insert(label);
        if created {
            grow_to_fit(&mut self.forward, id, self.growth_rate);
            grow_to_fit(&mut self.backward, id, self.growth_rate);
            trace!("New node added to network : [{}]{}", id, label);
        }
        id
    }

    /// Records the edge `src -> dst` with weight 1.0.
    ///
    /// Self-loops and repeated edges are dropped; both labels still get ids.
    pub fn add_edge(&mut self, src: &str, dst: &str) -> EdgeOutcome {
        let src_id = self.get_or_create_id(src);
        let dst_id = self.get_or_create_id(dst);

        if src_id == dst_id {
            trace!("Ignoring self-loop for node [{}]{}", src_id, src);
            return EdgeOutcome::SelfLoop;
        }

        match self.forward[src_id].entry(dst_id) {
            Entry::Occupied(_) => {
                trace!(
                    "Ignoring duplicate edge for nodes [{}]{} -> [{}]{}",
                    src_id, src, dst_id, dst
                );
                EdgeOutcome::Duplicate
            }
            Entry::Vacant(slot) => {
                slot.insert(1.0);
                self.num_edges += 1;
                self.backward[dst_id].insert(src_id);
                EdgeOutcome::Added
            }
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn growth_rate(&self) -> usize {
        self.growth_rate
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn id_of(&self, label: &str) -> Option<NodeId> {
        self.nodes.id_of(label)
    }

    /// Outbound edges of `id`.
    ///
    /// # Panics
    /// If `id` is not below `num_nodes()`.
    pub fn neighbors(&self, id: NodeId) -> &Neighbors {
        &self.forward[..self.nodes.len()][id]
    }

    /// Nodes with an edge pointing at `id`.
    ///
    /// # Panics
    /// If `id` is not below `num_nodes()`.
    pub fn predecessors(&self, id: NodeId) -> &Predecessors {
        &self.backward[..self.nodes.len()][id]
    }

    /// A rank leak has no outbound edges
    pub fn is_leak(&self, id: NodeId) -> bool {
        self.neighbors(id).is_empty()
    }

    /// `(id, outbound edges)` for every node, in id order
    pub fn adjacency(&self) -> impl Iterator<Item = (NodeId, &Neighbors)> + '_ {
        self.forward[..self.nodes.len()].iter().enumerate()
    }

    /// Reconnects every rank leak to all of its predecessors.
    ///
    /// For each node without outbound edges an edge `leak -> p` (weight 1.0) is
    /// added for every `p` pointing at it. The backward adjacency is consumed
    /// here and released; the returned graph has none.
    ///
    /// A leak nothing points at (an isolated node, or one whose only edge was
    /// a dropped self-loop) stays a leak, and its rank mass is lost on every
    /// power iteration round.
    pub fn repair_leaks(self) -> RepairedGraph {
        let Graph {
            num_edges,
            nodes,
            mut forward,
            backward,
            ..
        } = self;

        let node_count = nodes.len();
        forward.truncate(node_count);

        let mut edges_added = 0;
        let mut unrepaired = Vec::new();
        for (id, predecessors) in backward.into_iter().take(node_count).enumerate() {
            if !forward[id].is_empty() {
                continue;
            }
            if predecessors.is_empty() {
                unrepaired.push(id);
                continue;
            }

            trace!("Fixing rank leak {}", nodes.get(id).map(Node::to_string).unwrap_or_default());
            for back in predecessors {
                forward[id].insert(back, 1.0);
                trace!("Creating link [{}] -> [{}]", id, back);
                edges_added += 1;
            }
        }

        if edges_added > 0 {
            debug!("{} edges were added to fix leak nodes", edges_added);
        } else {
            debug!("There were no rank leaks to fix");
        }
        if !unrepaired.is_empty() {
            warn!(
                "{} leak node(s) have no predecessors and stay unrepaired, ranks will not sum to 1: {:?}",
                unrepaired.len(),
                unrepaired
            );
        }

        RepairedGraph {
            num_edges: num_edges + edges_added,
            edges_added,
            nodes,
            forward,
        }
    }
}

fn grow_to_fit<T: Default>(slots: &mut Vec<T>, id: NodeId, growth_rate: usize) {
    if slots.len() <= id {
        trace!("Resizing adjacency storage to {} slots", id + growth_rate);
        slots.resize_with(id + growth_rate, T::default);
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network")?;
        writeln!(f, "Nodes : [ID]URL")?;
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }

        writeln!(f, "Edges : ")?;
        for (id, neighbors) in self.adjacency() {
            write!(f, "{}\t: ", id)?;
            for neighbor in neighbors.keys() {
                write!(f, "{} ", neighbor)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Number of Nodes = {}", self.num_nodes())?;
        writeln!(f, "Number of Edges = {}", self.num_edges())
    }
}

/// Graph after leak repair: every node that had a predecessor now has at
/// least one outbound edge. Only forward adjacency survives.
#[derive(Debug, Clone)]
pub struct RepairedGraph {
    num_edges: usize,
    edges_added: usize,
    nodes: NodeTable,
    forward: Vec<Neighbors>,
}

impl RepairedGraph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Edges read from input plus the edges added by leak repair
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn edges_added(&self) -> usize {
        self.edges_added
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn neighbors(&self, id: NodeId) -> &Neighbors {
        &self.forward[id]
    }

    pub fn adjacency(&self) -> impl Iterator<Item = (NodeId, &Neighbors)> + '_ {
        self.forward.iter().enumerate()
    }

    pub fn into_nodes(self) -> NodeTable {
        self.nodes
    }
}
