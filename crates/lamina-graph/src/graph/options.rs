//! Graph configuration options.

/// Graphs are always directed; these flags only toggle parallel edges and nesting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    pub multigraph: bool,
    pub compound: bool,
}
