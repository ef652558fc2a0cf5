// Tests for report generation

use linkrank_core::rank::compute;
use linkrank_core::report::{generate_check_report, generate_rank_report, save_report};
use linkrank_core::{Graph, RankOptions, ReportFormat, analyze};
use tempfile::TempDir;

fn graph_from(edges: &[(&str, &str)]) -> Graph {
    let mut graph = Graph::new();
    for (src, dst) in edges {
        graph.add_edge(src, dst);
    }
    graph
}

// ============================================================================
// Report Format Tests
// ============================================================================

#[test]
fn test_report_format_from_str() {
    assert!(matches!(ReportFormat::from_str("text"), Some(ReportFormat::Text)));
    assert!(matches!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json)));
    assert!(ReportFormat::from_str("csv").is_none());
}

// ============================================================================
// Check Report Tests
// ============================================================================

#[test]
fn test_check_report_text_lists_leaks_and_sinks() {
    let graph = graph_from(&[("a", "b"), ("c", "d"), ("d", "c")]);
    let analysis = analyze(&graph);

    let report = generate_check_report(&graph, &analysis, ReportFormat::Text).unwrap();

    assert_eq!(
        report,
        "Leaks : there are 1 leak node(s)\n\
         [1]b\n\
         Sinks : there are 2 sink group(s)\n\
         Sink Group #0\n\
         [0]a\n\
         [1]b\n\
         Sink Group #1\n\
         [2]c\n\
         [3]d\n"
    );
}

#[test]
fn test_check_report_text_when_clean() {
    let graph = graph_from(&[("a", "b"), ("b", "a")]);
    let analysis = analyze(&graph);

    let report = generate_check_report(&graph, &analysis, ReportFormat::Text).unwrap();

    assert!(report.contains("No PageRank leaks were found in the network"));
    assert!(report.contains("No PageRank sinks were found in the network"));
}

#[test]
fn test_check_report_json() {
    let graph = graph_from(&[("A", "B"), ("B", "A"), ("C", "A")]);
    let analysis = analyze(&graph);

    let report = generate_check_report(&graph, &analysis, ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();

    assert_eq!(value["num_nodes"], 3);
    assert_eq!(value["leaks"].as_array().unwrap().len(), 0);
    assert_eq!(value["sinks"][0][0]["label"], "A");
    assert_eq!(value["sinks"][0][1]["id"], 1);
}

// ============================================================================
// Rank Report Tests
// ============================================================================

#[test]
fn test_rank_report_text_lines() {
    let graph = graph_from(&[("a", "b"), ("b", "a")]);
    let ranks = compute(graph, &RankOptions::new(0.85, 3).unwrap()).unwrap();

    let report = generate_rank_report(&ranks, ReportFormat::Text).unwrap();
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\ta"));
    assert!(lines[1].ends_with("\tb"));
    let rank: f64 = lines[0].split('\t').next().unwrap().parse().unwrap();
    assert!((rank - 0.5).abs() < 1e-9);
}

#[test]
fn test_rank_report_json() {
    let graph = graph_from(&[("a", "b"), ("b", "c")]);
    let options = RankOptions::new(0.85, 5).unwrap();
    let ranks = compute(graph, &options).unwrap();

    let report = generate_rank_report(&ranks, ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();

    assert_eq!(value["iterations"], 5);
    assert_eq!(value["converged"], false);
    assert_eq!(value["leak_edges_added"], 1);
    assert_eq!(value["ranks"].as_array().unwrap().len(), 3);
    assert_eq!(value["ranks"][2]["label"], "c");
}

// ============================================================================
// Save Tests
// ============================================================================

#[test]
fn test_save_report() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("report.txt");

    save_report("0.5\ta\n", &path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "0.5\ta\n");
}
