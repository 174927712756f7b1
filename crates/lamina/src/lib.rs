//! Crossing-minimizing node ordering for layered graph drawing.
//!
//! Given a DAG whose nodes already carry a `rank`, [`order::order`] picks a left-to-right
//! position (`order`) for every node within its rank so that weighted edge crossings between
//! adjacent ranks are (heuristically) minimized, keeping compound subgraphs contiguous.

pub use lamina_graph as graphlib;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod error;
pub use error::{Error, Result};

mod model;
pub use model::{EdgeLabel, GraphLabel, NodeLabel};

pub mod order;
pub mod util;
