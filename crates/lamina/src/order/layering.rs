//! The layering matrix: node ids per rank, left to right.

use super::OrderNode;
use crate::graphlib::Graph;
use std::ops::Index;

/// Node ids grouped by rank (outer index) in left-to-right order (inner index).
///
/// A plain value: cloning it is how the orchestrator snapshots the best solution so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layering {
    layers: Vec<Vec<String>>,
}

impl Layering {
    pub fn new(layers: Vec<Vec<String>>) -> Self {
        Self { layers }
    }

    /// Reads the current `rank`/`order` attributes of `g`.
    ///
    /// Subgraph nodes (nodes with children) and unranked nodes are skipped. Ranks below zero
    /// shift the whole matrix so the lowest rank lands at index 0; rank gaps become empty
    /// layers. Nodes without an `order` sort after ordered ones, by insertion order.
    pub fn from_graph<N, E, G>(g: &Graph<N, E, G>) -> Self
    where
        N: Default + OrderNode + 'static,
        E: Default + 'static,
        G: Default,
    {
        let mut entries: Vec<(i32, usize, usize, &str)> = Vec::new();
        for (ix, v) in g.nodes().enumerate() {
            if g.has_children(v) {
                continue;
            }
            let Some(node) = g.node(v) else {
                continue;
            };
            let Some(rank) = node.rank() else {
                continue;
            };
            entries.push((rank, node.order().unwrap_or(usize::MAX), ix, v));
        }

        let Some(min_rank) = entries.iter().map(|e| e.0).min() else {
            return Self::default();
        };
        let max_rank = entries.iter().map(|e| e.0).max().unwrap_or(min_rank);
        let shift = min_rank.min(0);
        let mut layers: Vec<Vec<(usize, usize, &str)>> =
            vec![Vec::new(); (max_rank - shift + 1) as usize];
        for (rank, order, ix, v) in entries {
            layers[(rank - shift) as usize].push((order, ix, v));
        }

        let layers = layers
            .into_iter()
            .map(|mut layer| {
                layer.sort_unstable_by_key(|&(order, ix, _)| (order, ix));
                layer.into_iter().map(|(_, _, v)| v.to_string()).collect()
            })
            .collect();
        Self { layers }
    }

    pub fn layers(&self) -> &[Vec<String>] {
        &self.layers
    }

    pub fn into_inner(self) -> Vec<Vec<String>> {
        self.layers
    }

    /// Number of ranks, including empty ones.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The ids at `rank`, or an empty slice past the end.
    pub fn rank(&self, rank: usize) -> &[String] {
        self.layers.get(rank).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec<String>> {
        self.layers.iter()
    }

    /// Writes each node's index within its layer as its `order`.
    pub fn assign_to<N, E, G>(&self, g: &mut Graph<N, E, G>)
    where
        N: Default + OrderNode + 'static,
        E: Default + 'static,
        G: Default,
    {
        for layer in &self.layers {
            for (i, v) in layer.iter().enumerate() {
                if let Some(node) = g.node_mut(v) {
                    node.set_order(i);
                }
            }
        }
    }
}

impl Index<usize> for Layering {
    type Output = [String];

    fn index(&self, rank: usize) -> &[String] {
        &self.layers[rank]
    }
}

impl<'a> IntoIterator for &'a Layering {
    type Item = &'a Vec<String>;
    type IntoIter = std::slice::Iter<'a, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

impl<S: AsRef<str>> From<Vec<Vec<S>>> for Layering {
    fn from(layers: Vec<Vec<S>>) -> Self {
        Self::new(
            layers
                .into_iter()
                .map(|layer| layer.iter().map(|v| v.as_ref().to_string()).collect())
                .collect(),
        )
    }
}
