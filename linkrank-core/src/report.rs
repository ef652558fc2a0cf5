// Report generation for check and run modes

use crate::analysis::Analysis;
use crate::error::Result;
use crate::graph::Graph;
use crate::node::{Node, NodeId, NodeTable};
use crate::rank::PageRanks;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport<'a> {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub leaks: Vec<&'a Node>,
    pub sinks: Vec<Vec<&'a Node>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankEntry<'a> {
    pub id: NodeId,
    pub label: &'a str,
    pub rank: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankReport<'a> {
    pub iterations: usize,
    pub converged: bool,
    pub leak_edges_added: usize,
    pub ranks: Vec<RankEntry<'a>>,
}

fn resolve<'a>(nodes: &'a NodeTable, ids: &[NodeId]) -> Vec<&'a Node> {
    ids.iter().filter_map(|&id| nodes.get(id)).collect()
}

pub fn gather_check_report<'a>(graph: &'a Graph, analysis: &Analysis) -> CheckReport<'a> {
    CheckReport {
        num_nodes: graph.num_nodes(),
        num_edges: graph.num_edges(),
        leaks: resolve(graph.nodes(), &analysis.leaks),
        sinks: analysis
            .sinks
            .iter()
            .map(|group| resolve(graph.nodes(), group))
            .collect(),
    }
}

pub fn gather_rank_report(ranks: &PageRanks) -> RankReport<'_> {
    RankReport {
        iterations: ranks.iterations(),
        converged: ranks.converged(),
        leak_edges_added: ranks.edges_added(),
        ranks: ranks
            .iter()
            .map(|(node, rank)| RankEntry {
                id: node.id(),
                label: node.label(),
                rank,
            })
            .collect(),
    }
}

/// Leak listing followed by the sink groups, one `[id]label` per line
pub fn generate_check_report(
    graph: &Graph,
    analysis: &Analysis,
    format: ReportFormat,
) -> Result<String> {
    let data = gather_check_report(graph, analysis);
    match format {
        ReportFormat::Text => Ok(check_report_text(&data)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&data)?),
    }
}

/// One `rank<TAB>label` line per node, in id order
pub fn generate_rank_report(ranks: &PageRanks, format: ReportFormat) -> Result<String> {
    let data = gather_rank_report(ranks);
    match format {
        ReportFormat::Text => Ok(rank_report_text(&data)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&data)?),
    }
}

fn check_report_text(data: &CheckReport<'_>) -> String {
    let mut report = String::new();

    if data.leaks.is_empty() {
        report.push_str("No PageRank leaks were found in the network\n");
    } else {
        report.push_str(&format!(
            "Leaks : there are {} leak node(s)\n",
            data.leaks.len()
        ));
        for node in &data.leaks {
            report.push_str(&format!("{}\n", node));
        }
    }

    if data.sinks.is_empty() {
        report.push_str("No PageRank sinks were found in the network\n");
    } else {
        report.push_str(&format!(
            "Sinks : there are {} sink group(s)\n",
            data.sinks.len()
        ));
        for (idx, group) in data.sinks.iter().enumerate() {
            report.push_str(&format!("Sink Group #{}\n", idx));
            for node in group {
                report.push_str(&format!("{}\n", node));
            }
        }
    }

    report
}

fn rank_report_text(data: &RankReport<'_>) -> String {
    let mut report = String::new();
    for entry in &data.ranks {
        report.push_str(&format!("{}\t{}\n", entry.rank, entry.label));
    }
    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
