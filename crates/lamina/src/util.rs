//! Helpers shared with the neighboring layout phases.
//!
//! Rank bookkeeping (`max_rank`, `normalize_ranks`, `remove_empty_ranks`), the layering matrix,
//! per-node weight aggregation, and the thin graph adapters that collapse multi-edges or strip
//! compound structure.

use crate::graphlib::{Graph, GraphOptions};
use crate::order::{Layering, OrderEdge, OrderNode};
use crate::{EdgeLabel, GraphLabel, NodeLabel};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Successors,
    Predecessors,
}

/// Sums the weights of every edge between `v` and each distinct neighbor in `direction`.
///
/// Neighbors appear in the order their first edge was inserted. A node with no edges in that
/// direction (or an unknown node) yields an empty map.
pub fn aggregate_weights<N, E, G>(
    g: &Graph<N, E, G>,
    v: &str,
    direction: Direction,
) -> IndexMap<String, f64>
where
    N: Default + 'static,
    E: Default + OrderEdge + 'static,
    G: Default,
{
    let mut out: IndexMap<String, f64> = IndexMap::new();
    match direction {
        Direction::Successors => {
            for (e, lbl) in g.out_edges(v) {
                *out.entry(e.w.clone()).or_insert(0.0) += lbl.weight();
            }
        }
        Direction::Predecessors => {
            for (e, lbl) in g.in_edges(v) {
                *out.entry(e.v.clone()).or_insert(0.0) += lbl.weight();
            }
        }
    }
    out
}

pub fn successor_weights<N, E, G>(g: &Graph<N, E, G>) -> IndexMap<String, IndexMap<String, f64>>
where
    N: Default + 'static,
    E: Default + OrderEdge + 'static,
    G: Default,
{
    g.nodes()
        .map(|v| {
            (
                v.to_string(),
                aggregate_weights(g, v, Direction::Successors),
            )
        })
        .collect()
}

pub fn predecessor_weights<N, E, G>(
    g: &Graph<N, E, G>,
) -> IndexMap<String, IndexMap<String, f64>>
where
    N: Default + 'static,
    E: Default + OrderEdge + 'static,
    G: Default,
{
    g.nodes()
        .map(|v| {
            (
                v.to_string(),
                aggregate_weights(g, v, Direction::Predecessors),
            )
        })
        .collect()
}

pub fn build_layer_matrix<N, E, G>(g: &Graph<N, E, G>) -> Layering
where
    N: Default + OrderNode + 'static,
    E: Default + 'static,
    G: Default,
{
    Layering::from_graph(g)
}

/// Highest rank among ranked nodes, or `None` when nothing has a rank.
pub fn max_rank<N, E, G>(g: &Graph<N, E, G>) -> Option<i32>
where
    N: Default + OrderNode + 'static,
    E: Default + 'static,
    G: Default,
{
    g.nodes()
        .filter_map(|v| g.node(v).and_then(|n| n.rank()))
        .max()
}

/// Shifts ranks so the smallest is 0. Nodes without a rank (subgraph placeholders) are left
/// alone.
pub fn normalize_ranks<E, G>(g: &mut Graph<NodeLabel, E, G>)
where
    E: Default + 'static,
    G: Default,
{
    let mut min_rank: Option<i32> = None;
    g.for_each_node(|_id, n| {
        if let Some(rank) = n.rank {
            min_rank = Some(min_rank.map_or(rank, |m| m.min(rank)));
        }
    });
    let Some(min_rank) = min_rank else {
        return;
    };
    g.for_each_node_mut(|_id, n| {
        if let Some(rank) = n.rank.as_mut() {
            *rank -= min_rank;
        }
    });
}

/// Collapses empty border ranks.
///
/// A rank index (relative to the minimum rank) that holds no nodes and is not a multiple of
/// `node_rank_factor` is removed; every populated rank above it moves down by one. Without a
/// positive factor this is a no-op.
pub fn remove_empty_ranks<E>(g: &mut Graph<NodeLabel, E, GraphLabel>)
where
    E: Default + 'static,
{
    let Some(factor) = g.graph().node_rank_factor.filter(|&f| f > 0) else {
        return;
    };

    let mut offset: Option<i32> = None;
    g.for_each_node(|_id, n| {
        if let Some(rank) = n.rank {
            offset = Some(offset.map_or(rank, |o| o.min(rank)));
        }
    });
    let Some(offset) = offset else {
        return;
    };

    let mut layers: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    g.for_each_node(|id, n| {
        if let Some(rank) = n.rank {
            layers
                .entry((rank - offset) as usize)
                .or_default()
                .push(id.to_string());
        }
    });
    let max_ix = layers.keys().next_back().copied().unwrap_or(0);

    let mut delta: i32 = 0;
    for i in 0..=max_ix {
        match layers.get(&i) {
            None if i % factor != 0 => delta -= 1,
            None => {}
            Some(vs) if delta != 0 => {
                for v in vs {
                    if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
                        *rank += delta;
                    }
                }
            }
            Some(_) => {}
        }
    }
}

/// Copies `g` into a simple graph, folding parallel edges into one edge whose weight is the sum
/// and whose `minlen` is the maximum of the originals.
pub fn simplify<N, G>(g: &Graph<N, EdgeLabel, G>) -> Graph<N, EdgeLabel, G>
where
    N: Default + Clone + 'static,
    G: Default + Clone,
{
    let mut simplified: Graph<N, EdgeLabel, G> = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    g.for_each_node(|v, lbl| {
        simplified.set_node(v, lbl.clone());
    });

    let mut merged: IndexMap<(String, String), EdgeLabel> = IndexMap::new();
    g.for_each_edge(|e, lbl| {
        merged
            .entry((e.v.clone(), e.w.clone()))
            .and_modify(|acc| {
                acc.weight += lbl.weight;
                acc.minlen = acc.minlen.max(lbl.minlen);
            })
            .or_insert_with(|| lbl.clone());
    });
    for ((v, w), lbl) in merged {
        simplified.set_edge_with_label(v, w, lbl);
    }
    simplified
}

/// Copies the leaves and every edge of `g` into a non-compound graph with the same multigraph
/// setting. Subgraph nodes (nodes with children) are dropped.
pub fn as_non_compound_graph<N, E, G>(g: &Graph<N, E, G>) -> Graph<N, E, G>
where
    N: Default + Clone + 'static,
    E: Default + Clone + 'static,
    G: Default + Clone,
{
    let mut flat: Graph<N, E, G> = Graph::new(GraphOptions {
        multigraph: g.is_multigraph(),
        compound: false,
    });
    flat.set_graph(g.graph().clone());
    g.for_each_node(|v, lbl| {
        if !g.has_children(v) {
            flat.set_node(v, lbl.clone());
        }
    });
    g.for_each_edge(|e, lbl| {
        flat.set_edge_named(e.v.clone(), e.w.clone(), e.name.clone(), Some(lbl.clone()));
    });
    flat
}

/// Runs `f` and reports its wall time as a `debug` event.
pub fn time<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let ms = start.elapsed().as_millis();
    tracing::debug!(target: "lamina::timing", "{name} time: {ms}ms");
    out
}
