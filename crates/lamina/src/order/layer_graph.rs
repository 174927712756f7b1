//! Rank-local graphs used by the ordering sweeps.
//!
//! A [`LayerGraph`] owns everything the sorter needs for one rank: the rank's leaves with their
//! aggregated neighbor weights in the adjacent rank, and a placeholder tree that mirrors the
//! compound structure above those leaves, rooted at a synthetic node standing for the whole
//! rank. It never borrows from the source graph, so it can be built once and reused by every
//! sweep; neighbor positions are looked up at sort time.

use super::{OrderEdge, OrderNode, Relationship};
use crate::graphlib::Graph;
use crate::util::{Direction, aggregate_weights};
use indexmap::IndexMap;
use rustc_hash::FxHashMap as HashMap;

/// Index of a node inside a [`LayerGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerIx(usize);

impl LayerIx {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerNodeKind {
    /// A real node of the rank. `neighbors` maps each neighbor in the adjacent rank to the
    /// summed weight of the edges connecting them.
    Leaf { neighbors: IndexMap<String, f64> },
    /// The synthetic root or a placeholder for a subgraph with members in this rank.
    Subgraph {
        children: Vec<LayerIx>,
        border_left: Option<LayerIx>,
        border_right: Option<LayerIx>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    id: String,
    parent: Option<LayerIx>,
    kind: LayerNodeKind,
}

impl LayerNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> Option<LayerIx> {
        self.parent
    }

    pub fn kind(&self) -> &LayerNodeKind {
        &self.kind
    }

    pub fn is_subgraph(&self) -> bool {
        matches!(self.kind, LayerNodeKind::Subgraph { .. })
    }

    /// Neighbor weights of a leaf; `None` for subgraphs.
    pub fn neighbors(&self) -> Option<&IndexMap<String, f64>> {
        match &self.kind {
            LayerNodeKind::Leaf { neighbors } => Some(neighbors),
            LayerNodeKind::Subgraph { .. } => None,
        }
    }

    /// Left and right border leaves, when both are present.
    pub fn borders(&self) -> Option<(LayerIx, LayerIx)> {
        match self.kind {
            LayerNodeKind::Subgraph {
                border_left: Some(left),
                border_right: Some(right),
                ..
            } => Some((left, right)),
            _ => None,
        }
    }
}

pub const ROOT_ID: &str = "_root";

#[derive(Debug, Clone, PartialEq)]
pub struct LayerGraph {
    rank: i32,
    relationship: Relationship,
    nodes: Vec<LayerNode>,
    index: HashMap<String, LayerIx>,
}

impl LayerGraph {
    fn empty(rank: i32, relationship: Relationship) -> Self {
        Self {
            rank,
            relationship,
            nodes: vec![LayerNode {
                id: ROOT_ID.to_string(),
                parent: None,
                kind: LayerNodeKind::Subgraph {
                    children: Vec::new(),
                    border_left: None,
                    border_right: None,
                },
            }],
            index: HashMap::default(),
        }
    }

    pub fn root(&self) -> LayerIx {
        LayerIx(0)
    }

    pub fn rank(&self) -> i32 {
        self.rank
    }

    pub fn relationship(&self) -> Relationship {
        self.relationship
    }

    /// Number of nodes, including the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the rank has no members (only the root exists).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn node(&self, ix: LayerIx) -> &LayerNode {
        &self.nodes[ix.0]
    }

    pub fn id(&self, ix: LayerIx) -> &str {
        &self.nodes[ix.0].id
    }

    /// Looks up a leaf or subgraph placeholder by its id in the source graph. The synthetic root
    /// is not addressable by id.
    pub fn find(&self, id: &str) -> Option<LayerIx> {
        self.index.get(id).copied()
    }

    pub fn parent(&self, ix: LayerIx) -> Option<LayerIx> {
        self.nodes[ix.0].parent
    }

    pub fn children(&self, ix: LayerIx) -> &[LayerIx] {
        match &self.nodes[ix.0].kind {
            LayerNodeKind::Subgraph { children, .. } => children,
            LayerNodeKind::Leaf { .. } => &[],
        }
    }

    pub fn leaves(&self) -> impl Iterator<Item = LayerIx> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_subgraph())
            .map(|(ix, _)| LayerIx(ix))
    }

    fn push(&mut self, id: &str, parent: LayerIx, kind: LayerNodeKind) -> LayerIx {
        let ix = LayerIx(self.nodes.len());
        self.nodes.push(LayerNode {
            id: id.to_string(),
            parent: Some(parent),
            kind,
        });
        self.index.insert(id.to_string(), ix);
        if let LayerNodeKind::Subgraph { children, .. } = &mut self.nodes[parent.0].kind {
            children.push(ix);
        }
        ix
    }

    /// Materializes placeholders for every ancestor of `v` that is not in the layer graph yet and
    /// returns the placeholder `v` hangs off.
    fn ensure_ancestors<N, E, G>(&mut self, g: &Graph<N, E, G>, v: &str) -> LayerIx
    where
        N: Default + 'static,
        E: Default + 'static,
        G: Default,
    {
        let mut missing: Vec<&str> = Vec::new();
        let mut cur = g.parent(v);
        let mut anchor = self.root();
        while let Some(p) = cur {
            if let Some(ix) = self.find(p) {
                anchor = ix;
                break;
            }
            if missing.contains(&p) {
                break;
            }
            missing.push(p);
            cur = g.parent(p);
        }
        for p in missing.into_iter().rev() {
            anchor = self.push(
                p,
                anchor,
                LayerNodeKind::Subgraph {
                    children: Vec::new(),
                    border_left: None,
                    border_right: None,
                },
            );
        }
        anchor
    }

    fn resolve_borders<N, E, G>(&mut self, g: &Graph<N, E, G>)
    where
        N: Default + OrderNode + 'static,
        E: Default + 'static,
        G: Default,
    {
        let rank = self.rank;
        for ix in 1..self.nodes.len() {
            let sg = LayerIx(ix);
            if !self.nodes[ix].is_subgraph() {
                continue;
            }
            let Some(label) = g.node(&self.nodes[ix].id) else {
                continue;
            };
            let own_leaf = |id: Option<&str>| {
                let b = self.find(id?)?;
                (self.parent(b) == Some(sg) && !self.node(b).is_subgraph()).then_some(b)
            };
            let left = own_leaf(label.border_left_at(rank));
            let right = own_leaf(label.border_right_at(rank));
            if let LayerNodeKind::Subgraph {
                border_left,
                border_right,
                ..
            } = &mut self.nodes[ix].kind
            {
                *border_left = left;
                *border_right = right;
            }
        }
    }
}

/// Builds the layer graph for `rank`, looking at predecessors in `rank - 1`
/// ([`Relationship::InEdges`]) or successors in `rank + 1` ([`Relationship::OutEdges`]).
pub fn build_layer_graph<N, E, G>(
    g: &Graph<N, E, G>,
    rank: i32,
    relationship: Relationship,
) -> LayerGraph
where
    N: Default + OrderNode + 'static,
    E: Default + OrderEdge + 'static,
    G: Default,
{
    let members: Vec<&str> = g
        .nodes()
        .filter(|v| !g.has_children(v) && g.node(v).and_then(|n| n.rank()) == Some(rank))
        .collect();
    build_layer_graph_from(g, rank, relationship, &members)
}

/// Like [`build_layer_graph`] for a precomputed list of the rank's leaves.
pub(super) fn build_layer_graph_from<N, E, G>(
    g: &Graph<N, E, G>,
    rank: i32,
    relationship: Relationship,
    members: &[&str],
) -> LayerGraph
where
    N: Default + OrderNode + 'static,
    E: Default + OrderEdge + 'static,
    G: Default,
{
    let mut lg = LayerGraph::empty(rank, relationship);
    let adjacent = relationship.adjacent_rank(rank);
    let direction = match relationship {
        Relationship::InEdges => Direction::Predecessors,
        Relationship::OutEdges => Direction::Successors,
    };

    for &v in members {
        if lg.find(v).is_some() {
            continue;
        }
        let parent = lg.ensure_ancestors(g, v);
        let mut neighbors = aggregate_weights(g, v, direction);
        neighbors.retain(|u, _| g.node(u).and_then(|n| n.rank()) == Some(adjacent));
        lg.push(v, parent, LayerNodeKind::Leaf { neighbors });
    }
    lg.resolve_borders(g);

    tracing::trace!(
        rank,
        ?relationship,
        nodes = lg.len(),
        "built layer graph"
    );
    lg
}
