// PageRank power iteration

use crate::error::{RankError, Result};
use crate::graph::{Graph, RepairedGraph};
use crate::node::{Node, NodeId, NodeTable};
use std::fmt;
use tracing::{debug, info, trace};

/// When power iteration may stop before the iteration cap
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Convergence {
    /// Always run the full number of iterations
    #[default]
    Never,
    /// Stop once every node's rank moved by less than this amount
    Tolerance(f64),
}

impl fmt::Display for Convergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convergence::Never => write!(f, "<no_convergence_check>"),
            Convergence::Tolerance(epsilon) => write!(f, "{}", epsilon),
        }
    }
}

/// Parameters of a PageRank computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    decay: f64,
    iterations: usize,
    convergence: Convergence,
}

impl RankOptions {
    /// `decay` must lie strictly between 0 and 1 and `iterations` must be
    /// positive. Convergence checking starts disabled.
    pub fn new(decay: f64, iterations: usize) -> Result<Self> {
        if !decay.is_finite() || decay <= 0.0 || decay >= 1.0 {
            return Err(RankError::InvalidDecay(decay));
        }
        if iterations == 0 {
            return Err(RankError::ZeroIterations);
        }

        Ok(Self {
            decay,
            iterations,
            convergence: Convergence::Never,
        })
    }

    /// Enables the convergence check with tolerance `epsilon` (> 0)
    pub fn with_tolerance(self, epsilon: f64) -> Result<Self> {
        self.with_convergence(Convergence::Tolerance(epsilon))
    }

    pub fn with_convergence(mut self, convergence: Convergence) -> Result<Self> {
        if let Convergence::Tolerance(epsilon) = convergence
            && (!epsilon.is_finite() || epsilon <= 0.0)
        {
            return Err(RankError::InvalidTolerance(epsilon));
        }
        self.convergence = convergence;
        Ok(self)
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn convergence(&self) -> Convergence {
        self.convergence
    }
}

/// Computed PageRank vector together with the nodes it ranks
#[derive(Debug, Clone)]
pub struct PageRanks {
    nodes: NodeTable,
    ranks: Vec<f64>,
    iterations: usize,
    converged: bool,
    edges_added: usize,
}

impl PageRanks {
    /// Ranks indexed by node id
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    pub fn rank_of(&self, id: NodeId) -> Option<f64> {
        self.ranks.get(id).copied()
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    /// `(node, rank)` in id order
    pub fn iter(&self) -> impl Iterator<Item = (&Node, f64)> + '_ {
        self.nodes.iter().zip(self.ranks.iter().copied())
    }

    /// Number of power iteration rounds actually performed
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// True when the tolerance test stopped the iteration early
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Links created by leak repair
    pub fn edges_added(&self) -> usize {
        self.edges_added
    }

    pub fn total(&self) -> f64 {
        self.ranks.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// Incoming edges of a node after normalization: `(source, d / out-degree)`,
/// sorted by source id
type Incoming = Vec<(NodeId, f64)>;

/// Computes PageRank for `graph`.
///
/// 1. Rank leaks are linked back to every node pointing at them.
/// 2. The adjacency is normalized (`d / out-degree`) and transposed in one pass.
/// 3. Ranks start uniform at `1/N`.
/// 4. `PR(k+1)[v] = (1-d)/N + sum(weight(u,v) * PR(k)[u])` is applied until the
///    iteration cap, or until every node moved by less than the tolerance.
///
/// Complexity per iteration is O(N + E).
pub fn compute(graph: Graph, options: &RankOptions) -> Result<PageRanks> {
    if graph.is_empty() {
        return Err(RankError::EmptyGraph);
    }

    info!(
        "Calculation parameters: decay factor = {}, iterations = {}, epsilon = {}",
        options.decay, options.iterations, options.convergence
    );

    debug!("Fixing rank leak nodes...");
    let repaired = graph.repair_leaks();

    debug!("Normalizing and transposing the adjacency matrix...");
    let transposed = normalize_transpose(&repaired, options.decay);

    let edges_added = repaired.edges_added();
    let nodes = repaired.into_nodes();
    let (ranks, iterations, converged) = power_iterate(&transposed, options);

    Ok(PageRanks {
        nodes,
        ranks,
        iterations,
        converged,
        edges_added,
    })
}

/// Builds `transposed[v] = [(u, d / |forward[u]|)]` for every edge `u -> v`
fn normalize_transpose(graph: &RepairedGraph, decay: f64) -> Vec<Incoming> {
    let mut transposed: Vec<Incoming> = vec![Vec::new(); graph.num_nodes()];

    for (source, neighbors) in graph.adjacency() {
        if neighbors.is_empty() {
            continue;
        }
        let weight = decay / neighbors.len() as f64;
        for &target in neighbors.keys() {
            transposed[target].push((source, weight));
        }
    }

    transposed
}

/// Returns `(ranks, rounds performed, converged)`
fn power_iterate(transposed: &[Incoming], options: &RankOptions) -> (Vec<f64>, usize, bool) {
    let num_nodes = transposed.len();
    let n = num_nodes as f64;
    let rank_const = (1.0 - options.decay) / n;

    let mut ranks = vec![1.0 / n; num_nodes];
    let mut new_ranks = vec![0.0; num_nodes];

    debug!("Performing power iteration...");
    for round in 1..=options.iterations {
        debug!("Iteration #{}", round);

        for (target, incoming) in transposed.iter().enumerate() {
            new_ranks[target] = rank_const
                + incoming
                    .iter()
                    .map(|&(source, weight)| weight * ranks[source])
                    .sum::<f64>();
        }
        trace!("PageRanks at iteration {}: {:?}", round, new_ranks);

        let done = match options.convergence {
            Convergence::Tolerance(epsilon) => is_converged(&new_ranks, &ranks, epsilon),
            Convergence::Never => false,
        };

        std::mem::swap(&mut ranks, &mut new_ranks);

        if done {
            info!("PageRanks converged within the given accuracy after {} iteration(s)", round);
            return (ranks, round, true);
        }
    }

    (ranks, options.iterations, false)
}

/// Every element moved by strictly less than `epsilon`
fn is_converged(new_ranks: &[f64], old_ranks: &[f64], epsilon: f64) -> bool {
    new_ranks
        .iter()
        .zip(old_ranks)
        .all(|(new, old)| (new - old).abs() < epsilon)
}
