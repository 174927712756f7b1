//! Subgraph precedence constraints collected during a sweep.

use super::layer_graph::{LayerGraph, LayerIx};
use crate::graphlib::{Graph, GraphOptions};
use rustc_hash::FxHashMap as HashMap;

/// "Subgraph `a` goes before sibling `b`" edges, keyed by subgraph id.
///
/// One instance lives for exactly one sweep and is threaded through every rank's sort so that
/// sibling subgraphs keep the relative order the first rank gave them. Recording `a -> b` twice
/// is a no-op; recording both `a -> b` and `b -> a` keeps both.
pub struct ConstraintGraph {
    graph: Graph<(), (), ()>,
}

impl ConstraintGraph {
    pub fn new() -> Self {
        Self {
            graph: Graph::new(GraphOptions::default()),
        }
    }

    pub fn add(&mut self, before: &str, after: &str) {
        self.graph.set_edge(before, after);
    }

    pub fn precedes(&self, before: &str, after: &str) -> bool {
        self.graph.has_edge(before, after, None)
    }

    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edges().map(|e| (e.v.as_str(), e.w.as_str()))
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }
}

impl Default for ConstraintGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConstraintGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.edges()).finish()
    }
}

/// Records, for a rank's sorted leaves `vs`, which sibling subgraph follows which.
///
/// Each leaf walks up its placeholder chain; at the first level where a different sibling was
/// seen last under the same parent, `previous -> current` is recorded and the walk stops.
pub fn add_subgraph_constraints(lg: &LayerGraph, cg: &mut ConstraintGraph, vs: &[LayerIx]) {
    let mut prev: HashMap<LayerIx, LayerIx> = HashMap::default();
    let mut root_prev: Option<LayerIx> = None;

    for &v in vs {
        let mut child = lg.parent(v);
        while let Some(c) = child {
            let parent = lg.parent(c);
            let prev_child = match parent {
                Some(p) => prev.insert(p, c),
                None => root_prev.replace(c),
            };
            if let Some(pc) = prev_child {
                if pc != c {
                    cg.add(lg.id(pc), lg.id(c));
                    break;
                }
            }
            child = parent;
        }
    }
}
