//! The barycenter heuristic: positional statistics, constraint-aware merging, and the recursive
//! subgraph sort.

use super::constraints::ConstraintGraph;
use super::layer_graph::{LayerGraph, LayerIx, LayerNodeKind};
use rustc_hash::FxHashMap as HashMap;
use std::cmp::Ordering;

/// Weighted mean neighbor position together with the total weight behind it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycenter {
    pub value: f64,
    pub weight: f64,
}

impl Barycenter {
    /// Weight-combines two optional barycenters. Zero-weight terms carry no information and are
    /// skipped.
    pub fn combine(a: Option<Barycenter>, b: Option<Barycenter>) -> Option<Barycenter> {
        let mut sum = 0.0;
        let mut weight = 0.0;
        for bc in [a, b].into_iter().flatten() {
            if bc.weight != 0.0 {
                sum += bc.value * bc.weight;
                weight += bc.weight;
            }
        }
        (weight != 0.0).then(|| Barycenter {
            value: sum / weight,
            weight,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: LayerIx,
    pub barycenter: Option<Barycenter>,
}

/// Computes the barycenter of each `movable` node from the current order of its neighbors.
///
/// Subgraph placeholders and leaves without neighbors get `None`. `order_of` reports the current
/// position of a node in the adjacent rank; unknown positions count as 0.
pub fn barycenter<F>(lg: &LayerGraph, movable: &[LayerIx], order_of: &F) -> Vec<BarycenterEntry>
where
    F: Fn(&str) -> Option<usize>,
{
    movable
        .iter()
        .map(|&v| {
            let barycenter = match lg.node(v).kind() {
                LayerNodeKind::Leaf { neighbors } => {
                    let mut sum = 0.0;
                    let mut weight = 0.0;
                    for (u, &w) in neighbors {
                        sum += w * order_of(u).unwrap_or(0) as f64;
                        weight += w;
                    }
                    (weight != 0.0).then(|| Barycenter {
                        value: sum / weight,
                        weight,
                    })
                }
                LayerNodeKind::Subgraph { .. } => None,
            };
            BarycenterEntry { v, barycenter }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<LayerIx>,
    /// Position of the entry (or, after merging, its leftmost member) among the movable nodes.
    pub index: usize,
    pub barycenter: Option<Barycenter>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortResult {
    pub vs: Vec<LayerIx>,
    pub barycenter: Option<Barycenter>,
}

#[derive(Debug)]
struct ConflictEntry {
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    vs: Vec<LayerIx>,
    index: usize,
    barycenter: Option<Barycenter>,
    merged: bool,
    processed: bool,
}

/// Coalesces entries whose barycenters disagree with recorded subgraph constraints.
///
/// Constraint edges between the entries form a DAG walked from its sources. Whenever a
/// constrained predecessor does not sort strictly before its successor (its barycenter is not
/// smaller, or either is undefined), the two are merged into one entry: predecessor's nodes
/// first, combined barycenter, smaller index. Entries caught on a constraint cycle are kept
/// unmerged after the rest, in index order.
pub fn resolve_conflicts(
    lg: &LayerGraph,
    entries: &[BarycenterEntry],
    cg: &ConstraintGraph,
) -> Vec<SortEntry> {
    let mut position: HashMap<LayerIx, usize> = HashMap::default();
    let mut conflicts: Vec<ConflictEntry> = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        position.insert(entry.v, i);
        conflicts.push(ConflictEntry {
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            vs: vec![entry.v],
            index: i,
            barycenter: entry.barycenter,
            merged: false,
            processed: false,
        });
    }

    if !cg.is_empty() {
        for (v, w) in cg.edges() {
            let v = lg.find(v).and_then(|ix| position.get(&ix));
            let w = lg.find(w).and_then(|ix| position.get(&ix));
            if let (Some(&v), Some(&w)) = (v, w) {
                conflicts[w].indegree += 1;
                conflicts[v].outs.push(w);
            }
        }
    }

    let mut sources: Vec<usize> = (0..conflicts.len())
        .filter(|&i| conflicts[i].indegree == 0)
        .collect();
    let mut processed: Vec<usize> = Vec::with_capacity(conflicts.len());

    while let Some(v) = sources.pop() {
        processed.push(v);
        conflicts[v].processed = true;

        let ins = std::mem::take(&mut conflicts[v].ins);
        for u in ins.into_iter().rev() {
            if conflicts[u].merged {
                continue;
            }
            let must_merge = match (conflicts[u].barycenter, conflicts[v].barycenter) {
                (Some(ub), Some(vb)) => ub.value >= vb.value,
                _ => true,
            };
            if must_merge {
                merge_entries(&mut conflicts, v, u);
            }
        }

        let outs = std::mem::take(&mut conflicts[v].outs);
        for w in outs {
            conflicts[w].ins.push(v);
            conflicts[w].indegree -= 1;
            if conflicts[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    let stuck = (0..conflicts.len()).filter(|&i| !conflicts[i].processed);
    let keep: Vec<usize> = processed
        .into_iter()
        .chain(stuck)
        .filter(|&i| !conflicts[i].merged)
        .collect();
    keep.into_iter()
        .map(|i| {
            let c = &mut conflicts[i];
            SortEntry {
                vs: std::mem::take(&mut c.vs),
                index: c.index,
                barycenter: c.barycenter,
            }
        })
        .collect()
}

fn merge_entries(conflicts: &mut [ConflictEntry], target: usize, source: usize) {
    let source_vs = std::mem::take(&mut conflicts[source].vs);
    let source_bc = conflicts[source].barycenter;
    let source_index = conflicts[source].index;
    conflicts[source].merged = true;

    let t = &mut conflicts[target];
    let mut vs = source_vs;
    vs.append(&mut t.vs);
    t.vs = vs;
    t.barycenter = Barycenter::combine(t.barycenter, source_bc);
    t.index = t.index.min(source_index);
}

/// Orders entries by barycenter, leaving entries without one at their original index.
///
/// Ties between equal barycenters go to the lower index, or to the higher index when
/// `bias_right` is set.
pub fn sort(entries: &[SortEntry], bias_right: bool) -> SortResult {
    let (mut sortable, mut unsortable): (Vec<&SortEntry>, Vec<&SortEntry>) =
        entries.iter().partition(|e| e.barycenter.is_some());

    // Popped from the back, so keep the smallest index last.
    unsortable.sort_by(|a, b| b.index.cmp(&a.index));
    sortable.sort_by(|a, b| compare_with_bias(a, b, bias_right));

    let mut vs: Vec<LayerIx> = Vec::with_capacity(entries.iter().map(|e| e.vs.len()).sum());
    let mut sum = 0.0;
    let mut weight = 0.0;

    let mut vs_index = consume_unsortable(&mut vs, &mut unsortable, 0);
    for entry in sortable {
        vs_index += entry.vs.len();
        vs.extend_from_slice(&entry.vs);
        if let Some(bc) = entry.barycenter {
            sum += bc.value * bc.weight;
            weight += bc.weight;
        }
        vs_index = consume_unsortable(&mut vs, &mut unsortable, vs_index);
    }

    let barycenter = (weight != 0.0).then(|| Barycenter {
        value: sum / weight,
        weight,
    });
    SortResult { vs, barycenter }
}

fn compare_with_bias(a: &SortEntry, b: &SortEntry, bias_right: bool) -> Ordering {
    let (Some(ab), Some(bb)) = (a.barycenter, b.barycenter) else {
        return Ordering::Equal;
    };
    match ab.value.partial_cmp(&bb.value) {
        Some(Ordering::Less) => Ordering::Less,
        Some(Ordering::Greater) => Ordering::Greater,
        _ if bias_right => b.index.cmp(&a.index),
        _ => a.index.cmp(&b.index),
    }
}

fn consume_unsortable(
    vs: &mut Vec<LayerIx>,
    unsortable: &mut Vec<&SortEntry>,
    mut index: usize,
) -> usize {
    while let Some(last) = unsortable.last() {
        if last.index > index {
            break;
        }
        vs.extend_from_slice(&last.vs);
        unsortable.pop();
        index += 1;
    }
    index
}

/// Orders the leaves below `v`, recursing into nested subgraphs so that every subgraph's leaves
/// come out as one contiguous run.
///
/// Border leaves of `v`, when it has both, are pinned to the two ends and their neighbors'
/// positions are folded into the returned barycenter. Reads only; the caller commits the order.
pub fn sort_subgraph<F>(
    lg: &LayerGraph,
    v: LayerIx,
    cg: &ConstraintGraph,
    bias_right: bool,
    order_of: &F,
) -> SortResult
where
    F: Fn(&str) -> Option<usize>,
{
    let borders = lg.node(v).borders();
    let mut movable: Vec<LayerIx> = lg
        .children(v)
        .iter()
        .copied()
        .filter(|&w| borders.is_none_or(|(left, right)| w != left && w != right))
        .collect();

    // Index by current position in the rank; ties and unsortable entries keep it.
    let positions: Option<Vec<usize>> = movable
        .iter()
        .map(|&w| current_position(lg, w, order_of))
        .collect();
    if let Some(positions) = positions {
        let mut keyed: Vec<(usize, LayerIx)> = positions.into_iter().zip(movable).collect();
        keyed.sort_by_key(|&(pos, _)| pos);
        movable = keyed.into_iter().map(|(_, w)| w).collect();
    }

    let mut subgraphs: HashMap<LayerIx, SortResult> = HashMap::default();
    let mut barycenters = barycenter(lg, &movable, order_of);
    for entry in &mut barycenters {
        if !lg.node(entry.v).is_subgraph() {
            continue;
        }
        let sub = sort_subgraph(lg, entry.v, cg, bias_right, order_of);
        if sub.barycenter.is_some() {
            entry.barycenter = Barycenter::combine(entry.barycenter, sub.barycenter);
        }
        subgraphs.insert(entry.v, sub);
    }

    let mut entries = resolve_conflicts(lg, &barycenters, cg);
    expand_subgraphs(&mut entries, &subgraphs);
    let mut result = sort(&entries, bias_right);

    if let Some((left, right)) = borders {
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(left);
        vs.append(&mut result.vs);
        vs.push(right);
        result.vs = vs;

        let first_neighbor = |b: LayerIx| {
            lg.node(b)
                .neighbors()
                .and_then(|n| n.keys().next())
                .map(|u| order_of(u).unwrap_or(0) as f64)
        };
        if let (Some(left_order), Some(right_order)) = (first_neighbor(left), first_neighbor(right))
        {
            let (value, weight) = result
                .barycenter
                .map_or((0.0, 0.0), |bc| (bc.value, bc.weight));
            result.barycenter = Some(Barycenter {
                value: (value * weight + left_order + right_order) / (weight + 2.0),
                weight: weight + 2.0,
            });
        }
    }

    result
}

/// Leftmost current order among the leaves under `v`.
fn current_position<F>(lg: &LayerGraph, v: LayerIx, order_of: &F) -> Option<usize>
where
    F: Fn(&str) -> Option<usize>,
{
    if lg.node(v).is_subgraph() {
        lg.children(v)
            .iter()
            .filter_map(|&w| current_position(lg, w, order_of))
            .min()
    } else {
        order_of(lg.id(v))
    }
}

fn expand_subgraphs(entries: &mut [SortEntry], subgraphs: &HashMap<LayerIx, SortResult>) {
    if subgraphs.is_empty() {
        return;
    }
    for entry in entries {
        let mut vs = Vec::with_capacity(entry.vs.len());
        for &v in &entry.vs {
            match subgraphs.get(&v) {
                Some(sub) => vs.extend_from_slice(&sub.vs),
                None => vs.push(v),
            }
        }
        entry.vs = vs;
    }
}
