//! Graph algorithms over [`Graph`].

use crate::Graph;
use std::collections::VecDeque;
use std::fmt;

/// Returned by [`topsort`] when the graph is not a DAG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// Nodes that could not be ordered: every node on a cycle plus everything reachable from one.
    pub nodes: Vec<String>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph has a cycle through {} node(s)", self.nodes.len())?;
        if let Some(first) = self.nodes.first() {
            write!(f, " (including {first:?})")?;
        }
        Ok(())
    }
}

impl std::error::Error for CycleError {}

/// Kahn's algorithm. Ties are broken by node insertion order, so the output is deterministic.
pub fn topsort<N, E, G>(g: &Graph<N, E, G>) -> Result<Vec<String>, CycleError>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let n = g.node_count();
    let mut indegree: Vec<usize> = (0..n).map(|ix| g.in_degree_ix(ix)).collect();
    let mut queue: VecDeque<usize> = (0..n).filter(|&ix| indegree[ix] == 0).collect();
    let mut out: Vec<String> = Vec::with_capacity(n);

    while let Some(ix) = queue.pop_front() {
        out.push(g.id_of(ix).to_string());
        for w in g.successor_ixs(ix) {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    if out.len() == n {
        return Ok(out);
    }
    let nodes = (0..n)
        .filter(|&ix| indegree[ix] > 0)
        .map(|ix| g.id_of(ix).to_string())
        .collect();
    Err(CycleError { nodes })
}

pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    topsort(g).is_ok()
}
