#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("subgraph {node:?} is its own ancestor")]
    ParentCycle { node: String },

    #[error("node {node:?} has no rank")]
    MissingRank { node: String },

    #[error("node {node:?} has negative rank {rank}; normalize ranks before ordering")]
    NegativeRank { node: String, rank: i32 },

    #[error("edge {v:?} -> {w:?} has invalid weight {weight}")]
    InvalidWeight { v: String, w: String, weight: f64 },

    #[error("graph is not acyclic: {} node(s) lie on or behind a cycle, starting at {:?}", .nodes.len(), .nodes.first())]
    Cycle { nodes: Vec<String> },

    #[error("invalid order options: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
