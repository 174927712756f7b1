//! Node ordering / crossing minimization.
//!
//! The pipeline: [`init_order`] seeds every rank with a depth-first order, then [`order`] sweeps
//! the ranks up and down, re-sorting each rank by the barycenter of its neighbors in the rank
//! it is swept against ([`sort_subgraph`]) while [`add_subgraph_constraints`] keeps sibling
//! subgraphs from swapping sides between ranks. [`cross_count`] scores each sweep.

mod types;
pub use types::{OrderEdge, OrderNode, Relationship, WeightLabel};

mod layering;
pub use layering::Layering;

mod layer_graph;
pub use layer_graph::{
    LayerGraph, LayerIx, LayerNode, LayerNodeKind, ROOT_ID, build_layer_graph,
};

mod barycenter;
pub use barycenter::{
    Barycenter, BarycenterEntry, SortEntry, SortResult, barycenter, resolve_conflicts, sort,
    sort_subgraph,
};

mod constraints;
pub use constraints::{ConstraintGraph, add_subgraph_constraints};

mod init_order;
pub use init_order::init_order;

mod cross_count;
pub use cross_count::cross_count;

mod ordering;
pub use ordering::{OrderOptions, OrderSummary, order};
