//! Graph container used by `lamina`.
//!
//! A directed graph keyed by string ids with per-node, per-edge, and whole-graph labels.
//! Optional multigraph support (parallel edges distinguished by a name) and optional compound
//! support (a parent/child forest over the nodes).

mod graph;

pub use graph::{EdgeKey, Graph, GraphOptions};

pub mod alg;
