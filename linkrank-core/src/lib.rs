//! Rank leak / rank sink analysis and PageRank for directed link graphs.
//!
//! A [`Graph`] is built from `(source, destination)` label pairs, usually
//! read from an edge-list file with [`ingest::load_graph`]. [`analysis`]
//! classifies its nodes into leaks and sink groups, and [`rank::compute`]
//! runs the PageRank power iteration over it.

pub mod analysis;
pub mod defaults;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod node;
pub mod rank;
pub mod report;

pub use analysis::{Analysis, SinkStatus, analyze, find_rank_leaks, find_rank_sinks};
pub use error::{RankError, Result};
pub use graph::{EdgeOutcome, Graph, RepairedGraph};
pub use node::{Node, NodeId, NodeTable};
pub use rank::{Convergence, PageRanks, RankOptions};
pub use report::ReportFormat;
