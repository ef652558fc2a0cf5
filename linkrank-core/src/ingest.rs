// Reading edge lists of the form `<src_url> <dst_url>`, one edge per line

use crate::defaults::PROGRESS_REPORT_STEP;
use crate::error::{RankError, Result};
use crate::graph::Graph;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, trace};

/// What a read pass consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Lines consumed, including blank ones
    pub lines: usize,
    /// Edge lines handed to the graph (self-loops and duplicates included)
    pub edges_read: usize,
    /// True when reading stopped at a line without exactly two tokens
    pub stopped_early: bool,
}

/// Opens an edge-list file for buffered reading
pub fn open_edge_list(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| RankError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Feeds every edge line of `reader` into `graph`.
///
/// Blank lines are skipped. The first line that does not hold exactly two
/// whitespace-separated tokens ends ingestion; that is not an error. Labels
/// are taken as raw bytes; invalid UTF-8 is replaced, never rejected.
pub fn read_edges<R: BufRead>(
    mut reader: R,
    graph: &mut Graph,
    progress: Option<&ProgressBar>,
) -> Result<IngestSummary> {
    let mut summary = IngestSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        summary.lines += 1;
        let line = String::from_utf8_lossy(&buf);

        let mut tokens = line.split_whitespace();
        let (src, dst) = match (tokens.next(), tokens.next(), tokens.next()) {
            (None, _, _) => continue,
            (Some(src), Some(dst), None) => (src, dst),
            _ => {
                debug!(
                    "Stopping at line {}: expected `<src> <dst>`, got {:?}",
                    summary.lines, line
                );
                summary.stopped_early = true;
                break;
            }
        };

        graph.add_edge(src, dst);
        summary.edges_read += 1;

        if summary.edges_read % PROGRESS_REPORT_STEP == 0 {
            debug!("{} Edges processed.", summary.edges_read);
            if let Some(pb) = progress {
                pb.set_message(format!("Reading network... {} edges processed", summary.edges_read));
            }
        }
    }

    Ok(summary)
}

/// Reads the edge-list file at `path` into a new graph
pub fn load_graph(path: &Path, growth_rate: usize, show_progress: bool) -> Result<Graph> {
    let mut graph = Graph::with_growth_rate(growth_rate)?;
    let reader = open_edge_list(path)?;

    let progress_bar = if show_progress {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Reading network...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    info!("Reading network from {}...", path.display());
    let summary = read_edges(reader, &mut graph, progress_bar.as_ref())?;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Network read: {} edges processed",
            summary.edges_read
        ));
    }

    info!("Network reading complete.");
    info!("Number of Nodes = {}", graph.num_nodes());
    info!("Number of Edges = {}", graph.num_edges());
    trace!("{}", graph);

    Ok(graph)
}
