//! Label types carried by the graphs `lamina` orders.
//!
//! Ordering itself is generic over [`OrderNode`](crate::order::OrderNode) /
//! [`OrderEdge`](crate::order::OrderEdge); these are the stock labels used by the utilities
//! and by callers that have no label types of their own.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphLabel {
    /// Spacing between node ranks after nesting-graph insertion; ranks that are not a multiple
    /// of this factor are border ranks and may be dropped by
    /// [`remove_empty_ranks`](crate::util::remove_empty_ranks).
    pub node_rank_factor: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub rank: Option<i32>,
    pub order: Option<usize>,
    /// Left border node of a subgraph, indexed by rank.
    pub border_left: Vec<Option<String>>,
    /// Right border node of a subgraph, indexed by rank.
    pub border_right: Vec<Option<String>>,
}

impl NodeLabel {
    pub fn with_rank(rank: i32) -> Self {
        Self {
            rank: Some(rank),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub weight: f64,
    pub minlen: usize,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            weight: 1.0,
            minlen: 1,
        }
    }
}
