// Tests for the link graph store

use linkrank_core::{EdgeOutcome, Graph, RankError};

fn graph_from(edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for (src, dst) in edges {
        graph.add_edge(src, dst);
    }
    graph
}

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_zero_growth_rate_rejected() {
    let result = Graph::with_growth_rate(0);
    assert!(matches!(result, Err(RankError::ZeroGrowthRate)));
}

#[test]
fn test_new_graph_is_empty() {
    let graph = Graph::with_growth_rate(16).unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.num_nodes(), 0);
    assert_eq!(graph.num_edges(), 0);
    assert_eq!(graph.growth_rate(), 16);
}

// ============================================================================
// Node Identity Tests
// ============================================================================

#[test]
fn test_ids_are_dense_in_first_seen_order() {
    let graph = graph_from(&[
        ("http://a.com", "http://b.com"),
        ("http://c.com", "http://a.com"),
        ("http://b.com", "http://d.com"),
    ]);

    assert_eq!(graph.num_nodes(), 4);
    let labels: Vec<&str> = graph.nodes().iter().map(|n| n.label()).collect();
    assert_eq!(
        labels,
        vec!["http://a.com", "http://b.com", "http://c.com", "http://d.com"]
    );

    for (expected_id, node) in graph.nodes().iter().enumerate() {
        assert_eq!(node.id(), expected_id);
        assert_eq!(graph.id_of(node.label()), Some(expected_id));
    }
}

#[test]
fn test_get_or_create_id_returns_existing_id() {
    let mut graph = Graph::new();
    let a = graph.get_or_create_id("a");
    let b = graph.get_or_create_id("b");
    assert_eq!(graph.get_or_create_id("a"), a);
    assert_ne!(a, b);
    assert_eq!(graph.num_nodes(), 2);
    assert_eq!(graph.num_edges(), 0);
}

#[test]
fn test_growth_rate_of_one_still_indexes_every_node() {
    let mut graph = Graph::with_growth_rate(1).unwrap();
    for i in 0..50 {
        graph.add_edge(&format!("n{}", i), &format!("n{}", i + 1));
    }

    assert_eq!(graph.num_nodes(), 51);
    assert_eq!(graph.num_edges(), 50);
    assert!(graph.is_leak(50));
    assert!(graph.predecessors(50).contains(&49));
}

// ============================================================================
// Edge Policy Tests
// ============================================================================

#[test]
fn test_self_loop_ignored_but_node_created() {
    let mut graph = Graph::new();
    assert_eq!(graph.add_edge("a", "a"), EdgeOutcome::SelfLoop);

    assert_eq!(graph.num_nodes(), 1);
    assert_eq!(graph.num_edges(), 0);
    assert!(graph.neighbors(0).is_empty());
    assert!(graph.predecessors(0).is_empty());
}

#[test]
fn test_duplicate_edge_is_idempotent() {
    let mut once = Graph::new();
    once.add_edge("x", "y");

    let mut twice = Graph::new();
    assert_eq!(twice.add_edge("x", "y"), EdgeOutcome::Added);
    assert_eq!(twice.add_edge("x", "y"), EdgeOutcome::Duplicate);

    assert_eq!(once.num_edges(), twice.num_edges());
    assert_eq!(once.neighbors(0), twice.neighbors(0));
    assert_eq!(once.predecessors(1), twice.predecessors(1));
}

#[test]
fn test_edges_start_with_unit_weight() {
    let graph = graph_from(&[("a", "b"), ("a", "c")]);
    let weights: Vec<(usize, f64)> = graph.neighbors(0).iter().map(|(&k, &v)| (k, v)).collect();
    assert_eq!(weights, vec![(1, 1.0), (2, 1.0)]);
}

#[test]
fn test_backward_mirrors_forward() {
    let graph = graph_from(&[("a", "b"), ("b", "c"), ("c", "a"), ("a", "c"), ("c", "c")]);

    for (src, neighbors) in graph.adjacency() {
        for &dst in neighbors.keys() {
            assert!(graph.predecessors(dst).contains(&src));
        }
    }
    for dst in 0..graph.num_nodes() {
        for &src in graph.predecessors(dst) {
            assert!(graph.neighbors(src).contains_key(&dst));
        }
    }
}

#[test]
fn test_is_leak() {
    let graph = graph_from(&[("a", "b"), ("b", "c")]);
    assert!(!graph.is_leak(0));
    assert!(!graph.is_leak(1));
    assert!(graph.is_leak(2));
}

// ============================================================================
// Leak Repair Tests
// ============================================================================

#[test]
fn test_repair_links_leak_to_its_predecessor() {
    // a -> b -> c, c is a leak
    let graph = graph_from(&[("a", "b"), ("b", "c")]);
    let repaired = graph.repair_leaks();

    assert_eq!(repaired.edges_added(), 1);
    assert_eq!(repaired.num_edges(), 3);
    let c_out: Vec<usize> = repaired.neighbors(2).keys().copied().collect();
    assert_eq!(c_out, vec![1]);
    assert_eq!(repaired.neighbors(2)[&1], 1.0);
}

#[test]
fn test_repair_links_leak_to_all_predecessors() {
    let graph = graph_from(&[("a", "z"), ("b", "z"), ("c", "z"), ("a", "b")]);
    let repaired = graph.repair_leaks();

    let z_out: Vec<usize> = repaired.neighbors(1).keys().copied().collect();
    assert_eq!(z_out, vec![0, 2, 3]);
    assert_eq!(repaired.edges_added(), 3);
}

#[test]
fn test_repair_leaves_non_leaks_untouched() {
    let graph = graph_from(&[("a", "b"), ("b", "a")]);
    let before: Vec<_> = graph.adjacency().map(|(_, n)| n.clone()).collect();
    let repaired = graph.repair_leaks();
    let after: Vec<_> = repaired.adjacency().map(|(_, n)| n.clone()).collect();

    assert_eq!(repaired.edges_added(), 0);
    assert_eq!(before, after);
}

#[test]
fn test_isolated_node_stays_a_leak_after_repair() {
    let mut graph = Graph::new();
    graph.add_edge("lonely", "lonely");
    let repaired = graph.repair_leaks();
    assert!(repaired.neighbors(0).is_empty());
}

// ============================================================================
// Display Tests
// ============================================================================

#[test]
fn test_network_dump() {
    let graph = graph_from(&[("a", "b"), ("a", "c")]);
    let dump = graph.to_string();

    assert!(dump.starts_with("Network\n"));
    assert!(dump.contains("[0]a\n[1]b\n[2]c\n"));
    assert!(dump.contains("0\t: 1 2 \n"));
    assert!(dump.contains("Number of Nodes = 3"));
    assert!(dump.contains("Number of Edges = 2"));
}
