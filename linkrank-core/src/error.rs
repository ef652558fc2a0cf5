use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankError {
    #[error("Growth rate of the network cannot be zero")]
    ZeroGrowthRate,

    #[error("Cannot rank an empty network (no nodes were read)")]
    EmptyGraph,

    #[error("Decay factor must be between 0 and 1 (exclusive), got {0}")]
    InvalidDecay(f64),

    #[error("Number of iterations must be greater than zero")]
    ZeroIterations,

    #[error("Convergence tolerance must be a positive number, got {0}")]
    InvalidTolerance(f64),

    #[error("Couldn't open file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RankError>;
