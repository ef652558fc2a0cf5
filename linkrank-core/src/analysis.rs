// Rank leak and rank sink detection

use crate::graph::Graph;
use crate::node::NodeId;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Classification state of a node during the sink search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    /// Not classified yet
    Unknown,
    /// Every node of the graph can be reached from this node
    NotSink,
    /// Belongs to a rank sink (or is a rank leak)
    Sink,
}

/// Result of a full leak/sink check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Rank leak node ids, ascending
    pub leaks: Vec<NodeId>,
    /// Rank sink groups; each group sorted by id, groups pairwise disjoint
    pub sinks: Vec<Vec<NodeId>>,
}

impl Analysis {
    pub fn has_leaks(&self) -> bool {
        !self.leaks.is_empty()
    }

    pub fn has_sinks(&self) -> bool {
        !self.sinks.is_empty()
    }
}

/// Runs leak detection followed by sink detection
pub fn analyze(graph: &Graph) -> Analysis {
    let leaks = find_rank_leaks(graph);
    debug!("Found {} rank leak(s)", leaks.len());
    let sinks = find_rank_sinks(graph);
    debug!("Found {} rank sink group(s)", sinks.len());
    Analysis { leaks, sinks }
}

/// Nodes with no outbound edges, in id order. O(N)
pub fn find_rank_leaks(graph: &Graph) -> Vec<NodeId> {
    (0..graph.num_nodes())
        .filter(|&id| graph.is_leak(id))
        .collect()
}

/// Groups of nodes that cannot reach the rest of the graph.
///
/// Every node that is not already classified starts a breadth-first search
/// over outbound edges. Reaching a `NotSink` node means the start node can
/// reach everything too, so the search stops there. A search that exhausts
/// its frontier without visiting every node yields a sink group; a group that
/// shares nodes with an earlier group is merged into it.
///
/// Rank leaks are marked `Sink` up front and never start a search, but a
/// search that reaches a leak keeps it in its group.
///
/// Worst case O(N x (N + E)).
pub fn find_rank_sinks(graph: &Graph) -> Vec<Vec<NodeId>> {
    let num_nodes = graph.num_nodes();
    let mut status = vec![SinkStatus::Unknown; num_nodes];
    let mut sinks: Vec<Vec<NodeId>> = Vec::new();

    for start in 0..num_nodes {
        if graph.is_leak(start) {
            trace!("node {} is a rank leak, skipping...", start);
            status[start] = SinkStatus::Sink;
            continue;
        }
        if status[start] == SinkStatus::Sink {
            trace!("node {} is already in a sink, skipping...", start);
            continue;
        }

        trace!("starting node {}", start);
        let Some(mut connected) = reach_from(graph, start, &status) else {
            trace!(
                "Arrived at a node marked NOT a sink; node {} is not a sink",
                start
            );
            status[start] = SinkStatus::NotSink;
            continue;
        };

        if connected.len() == num_nodes {
            trace!("All nodes can be reached from node {}; not a sink", start);
            status[start] = SinkStatus::NotSink;
            continue;
        }

        trace!(
            "Rank sink found: only {} of {} nodes visited from node {}: {:?}",
            connected.len(),
            num_nodes,
            start,
            connected
        );
        connected.sort_unstable();
        for &member in &connected {
            status[member] = SinkStatus::Sink;
        }
        merge_rank_sink(&mut sinks, connected);
    }

    sinks
}

/// Breadth-first search from `start`, returning the visited nodes in visiting
/// order, or `None` as soon as a `NotSink` node is dequeued.
fn reach_from(graph: &Graph, start: NodeId, status: &[SinkStatus]) -> Option<Vec<NodeId>> {
    let mut visited = vec![false; graph.num_nodes()];
    let mut connected = Vec::new();
    let mut bfs = VecDeque::from([start]);

    while let Some(current) = bfs.pop_front() {
        if visited[current] {
            continue;
        }
        visited[current] = true;
        connected.push(current);

        if status[current] == SinkStatus::NotSink {
            return None;
        }

        for &next in graph.neighbors(current).keys() {
            if !visited[next] {
                bfs.push_back(next);
            }
        }
    }

    Some(connected)
}

/// Merges `new_sink` into the first existing group it intersects, or appends
/// it as a new group. Both sides must be sorted. Returns true on merge.
fn merge_rank_sink(sinks: &mut Vec<Vec<NodeId>>, new_sink: Vec<NodeId>) -> bool {
    for sink in sinks.iter_mut() {
        if has_intersection(sink, &new_sink) {
            *sink = sorted_union(sink, &new_sink);
            trace!("Rank sink is merged with a previously found sink");
            return true;
        }
    }

    sinks.push(new_sink);
    trace!("New rank sink created");
    false
}

fn has_intersection(a: &[NodeId], b: &[NodeId]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => return true,
        }
    }
    false
}

fn sorted_union(a: &[NodeId], b: &[NodeId]) -> Vec<NodeId> {
    let mut merged = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => {
                merged.push(a[i]);
                i += 1;
            }
            Ordering::Greater => {
                merged.push(b[j]);
                j += 1;
            }
            Ordering::Equal => {
                merged.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&a[i..]);
    merged.extend_from_slice(&b[j..]);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_intersection() {
        assert!(has_intersection(&[1, 3, 5], &[2, 3]));
        assert!(!has_intersection(&[1, 3, 5], &[0, 2, 4, 6]));
        assert!(!has_intersection(&[], &[1]));
    }

    #[test]
    fn test_sorted_union_removes_duplicates() {
        assert_eq!(sorted_union(&[0, 2, 4], &[1, 2, 5]), vec![0, 1, 2, 4, 5]);
        assert_eq!(sorted_union(&[], &[7]), vec![7]);
    }

    #[test]
    fn test_merge_rank_sink_merges_into_first_intersecting_group() {
        let mut sinks = vec![vec![0, 1], vec![4, 5]];

        assert!(merge_rank_sink(&mut sinks, vec![1, 2]));
        assert_eq!(sinks, vec![vec![0, 1, 2], vec![4, 5]]);

        assert!(!merge_rank_sink(&mut sinks, vec![7]));
        assert_eq!(sinks.len(), 3);
    }

    #[test]
    fn test_reach_from_stops_at_not_sink_node() {
        let mut graph = Graph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "c");
        graph.add_edge("c", "a");

        let mut status = vec![SinkStatus::Unknown; 3];
        assert_eq!(reach_from(&graph, 0, &status), Some(vec![0, 1, 2]));

        status[1] = SinkStatus::NotSink;
        assert_eq!(reach_from(&graph, 0, &status), None);
    }
}
