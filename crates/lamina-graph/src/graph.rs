//! The `Graph` container.
//!
//! Nodes and edges live in insertion-ordered vectors; adjacency is kept per node as lists of
//! edge indices so predecessor/successor queries never scan the full edge list. Nothing is ever
//! removed, so indices stay stable for the lifetime of the graph.

mod edge_key;
mod entries;
mod options;

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

use edge_key::EdgeKeyView;
use entries::{EdgeEntry, NodeEntry};
use rustc_hash::FxBuildHasher;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

pub struct Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    options: GraphOptions,

    graph_label: G,
    default_node_label: Box<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Box<dyn Fn() -> E + Send + Sync>,

    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Indexed by node index. `None` means the node hangs off the implicit root.
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            default_node_label: Box::new(N::default),
            default_edge_label: Box::new(E::default),
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            parent: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.graph_label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Box::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Box::new(f);
        self
    }

    // ---- nodes ----

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&ix) = self.node_index.get(&id) {
            self.nodes[ix].label = label;
            return self;
        }
        self.push_node(id, label);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        self.ensure_node_ix(id.into());
        self
    }

    fn ensure_node_ix(&mut self, id: String) -> usize {
        if let Some(&ix) = self.node_index.get(&id) {
            return ix;
        }
        let label = (self.default_node_label)();
        self.push_node(id, label)
    }

    fn push_node(&mut self, id: String, label: N) -> usize {
        let ix = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
            out_edges: Vec::new(),
            in_edges: Vec::new(),
        });
        self.parent.push(None);
        self.children.push(Vec::new());
        self.node_index.insert(id, ix);
        ix
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&ix| &self.nodes[ix].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |ix| &mut self.nodes[ix].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn for_each_node<F>(&self, mut f: F)
    where
        F: FnMut(&str, &N),
    {
        for n in &self.nodes {
            f(&n.id, &n.label);
        }
    }

    pub fn for_each_node_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&str, &mut N),
    {
        for n in &mut self.nodes {
            f(&n.id, &mut n.label);
        }
    }

    // ---- edges ----

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn for_each_edge<F>(&self, mut f: F)
    where
        F: FnMut(&EdgeKey, &E),
    {
        for e in &self.edges {
            f(&e.key, &e.label);
        }
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    /// Inserts or updates an edge. `name` is ignored unless the graph is a multigraph; `label`
    /// of `None` keeps an existing label or uses the default edge label for a new edge.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let name = if self.options.multigraph {
            name.map(Into::into)
        } else {
            None
        };
        let key = EdgeKey {
            v: v.into(),
            w: w.into(),
            name,
        };

        if let Some(&ix) = self.edge_index.get(&key.view()) {
            if let Some(label) = label {
                self.edges[ix].label = label;
            }
            return self;
        }

        let v_ix = self.ensure_node_ix(key.v.clone());
        let w_ix = self.ensure_node_ix(key.w.clone());
        let ix = self.edges.len();
        self.edges.push(EdgeEntry {
            key: key.clone(),
            w_ix,
            label: label.unwrap_or_else(|| (self.default_edge_label)()),
        });
        self.nodes[v_ix].out_edges.push(ix);
        self.nodes[w_ix].in_edges.push(ix);
        self.edge_index.insert(key, ix);
        self
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    fn key_view<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyView<'a> {
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyView { v, w, name }
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edge_index.contains_key(&self.key_view(v, w, name))
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edge_index
            .get(&self.key_view(v, w, name))
            .map(|&ix| &self.edges[ix].label)
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let ix = self.edge_index.get(&self.key_view(v, w, name)).copied()?;
        Some(&mut self.edges[ix].label)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    /// Outgoing edges of `v` in insertion order, one item per edge (parallel edges repeat `w`).
    pub fn out_edges<'a>(
        &'a self,
        v: &str,
    ) -> impl Iterator<Item = (&'a EdgeKey, &'a E)> + use<'a, N, E, G> {
        let adj: &'a [usize] = match self.node_index.get(v) {
            Some(&ix) => &self.nodes[ix].out_edges,
            None => &[],
        };
        adj.iter().map(move |&e| {
            let e = &self.edges[e];
            (&e.key, &e.label)
        })
    }

    /// Incoming edges of `v` in insertion order, one item per edge.
    pub fn in_edges<'a>(
        &'a self,
        v: &str,
    ) -> impl Iterator<Item = (&'a EdgeKey, &'a E)> + use<'a, N, E, G> {
        let adj: &'a [usize] = match self.node_index.get(v) {
            Some(&ix) => &self.nodes[ix].in_edges,
            None => &[],
        };
        adj.iter().map(move |&e| {
            let e = &self.edges[e];
            (&e.key, &e.label)
        })
    }

    /// Heads of `v`'s outgoing edges, with multiplicity.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        self.out_edges(v).map(|(k, _)| k.w.as_str()).collect()
    }

    /// Tails of `v`'s incoming edges, with multiplicity.
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        self.in_edges(v).map(|(k, _)| k.v.as_str()).collect()
    }

    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.in_edges.is_empty())
            .map(|n| n.id.as_str())
            .collect()
    }

    pub(crate) fn in_degree_ix(&self, ix: usize) -> usize {
        self.nodes[ix].in_edges.len()
    }

    pub(crate) fn successor_ixs(&self, ix: usize) -> impl Iterator<Item = usize> + '_ {
        self.nodes[ix].out_edges.iter().map(|&e| self.edges[e].w_ix)
    }

    pub(crate) fn id_of(&self, ix: usize) -> &str {
        &self.nodes[ix].id
    }

    // ---- compound structure ----

    /// Moves `child` under `parent`, creating either node if needed. No-op on non-compound
    /// graphs.
    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        if !self.options.compound {
            return self;
        }
        let child = self.ensure_node_ix(child.into());
        let parent = self.ensure_node_ix(parent.into());
        self.detach(child);
        self.parent[child] = Some(parent);
        self.children[parent].push(child);
        self
    }

    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(&ix) = self.node_index.get(child) {
            self.detach(ix);
        }
        self
    }

    fn detach(&mut self, child: usize) {
        if let Some(prev) = self.parent[child].take() {
            self.children[prev].retain(|&c| c != child);
        }
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        let &ix = self.node_index.get(child)?;
        self.parent[ix].map(|p| self.nodes[p].id.as_str())
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.children_iter(parent).collect()
    }

    pub fn children_iter<'a>(
        &'a self,
        parent: &str,
    ) -> impl Iterator<Item = &'a str> + use<'a, N, E, G> {
        let ch: &'a [usize] = match self.node_index.get(parent) {
            Some(&ix) => &self.children[ix],
            None => &[],
        };
        ch.iter().map(move |&c| self.nodes[c].id.as_str())
    }

    pub fn has_children(&self, v: &str) -> bool {
        self.node_index
            .get(v)
            .is_some_and(|&ix| !self.children[ix].is_empty())
    }

    /// Nodes without a parent, in insertion order.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(ix, _)| self.parent[*ix].is_none())
            .map(|(_, n)| n.id.as_str())
            .collect()
    }
}
