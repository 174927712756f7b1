use super::{Layering, OrderEdge};
use crate::graphlib::Graph;
use rustc_hash::FxHashMap as HashMap;

/// Weighted number of edge crossings in `layering`.
///
/// Sums, over every pair of adjacent ranks, the product of weights of each pair of crossing
/// edges. Only edges from rank `i` to rank `i + 1` count; edges leaving the pair are ignored.
pub fn cross_count<N, E, G>(g: &Graph<N, E, G>, layering: &Layering) -> f64
where
    N: Default + 'static,
    E: Default + OrderEdge + 'static,
    G: Default,
{
    layering
        .layers()
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

#[derive(Debug, Clone, Copy)]
struct SouthEntry {
    pos: usize,
    weight: f64,
}

/// Counts inversions among the south endpoints, visited north node by north node, with an
/// accumulator tree over south positions.
fn two_layer_cross_count<N, E, G>(g: &Graph<N, E, G>, north: &[String], south: &[String]) -> f64
where
    N: Default + 'static,
    E: Default + OrderEdge + 'static,
    G: Default,
{
    if south.is_empty() {
        return 0.0;
    }

    let south_pos: HashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut south_entries: Vec<SouthEntry> = Vec::new();
    for v in north {
        let start = south_entries.len();
        south_entries.extend(g.out_edges(v).filter_map(|(e, lbl)| {
            let pos = *south_pos.get(e.w.as_str())?;
            Some(SouthEntry {
                pos,
                weight: lbl.weight(),
            })
        }));
        south_entries[start..].sort_by_key(|e| e.pos);
    }

    let mut tree = AccumulatorTree::new(south.len());
    south_entries
        .into_iter()
        .map(|entry| entry.weight * tree.insert(entry.pos, entry.weight))
        .sum()
}

/// Complete binary tree over south positions; each inner node holds the weight inserted below it.
struct AccumulatorTree {
    nodes: Vec<f64>,
    first_leaf: usize,
}

impl AccumulatorTree {
    fn new(positions: usize) -> Self {
        let leaves = positions.max(1).next_power_of_two();
        Self {
            nodes: vec![0.0; 2 * leaves - 1],
            first_leaf: leaves - 1,
        }
    }

    /// Adds `weight` at `pos` and returns the weight already inserted at positions after it.
    fn insert(&mut self, pos: usize, weight: f64) -> f64 {
        let mut ix = self.first_leaf + pos;
        self.nodes[ix] += weight;
        let mut right_of = 0.0;
        while ix > 0 {
            if ix % 2 == 1 {
                right_of += self.nodes[ix + 1];
            }
            ix = (ix - 1) / 2;
            self.nodes[ix] += weight;
        }
        right_of
    }
}
