use super::{Layering, OrderNode};
use crate::graphlib::Graph;
use indexmap::IndexMap;
use rustc_hash::FxHashSet as HashSet;

/// Builds a starting layering by walking the graph depth-first.
///
/// Leaves are visited from the lowest rank up (insertion order within a rank), following
/// successors, and each one is appended to its rank when first reached. Nodes that share an edge
/// therefore tend to start out near each other. Each rank is then regrouped so that the members
/// of every subgraph form one contiguous run; relative order inside a group is kept.
///
/// Unranked leaves are left out. Ranks are shifted like [`Layering::from_graph`] so index 0 is
/// the lowest rank when any rank is negative.
pub fn init_order<N, E, G>(g: &Graph<N, E, G>) -> Layering
where
    N: Default + OrderNode + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut leaves: Vec<(i32, usize, &str)> = g
        .nodes()
        .enumerate()
        .filter(|(_, v)| !g.has_children(v))
        .filter_map(|(ix, v)| Some((g.node(v)?.rank()?, ix, v)))
        .collect();
    let Some(min_rank) = leaves.iter().map(|l| l.0).min() else {
        return Layering::default();
    };
    let max_rank = leaves.iter().map(|l| l.0).max().unwrap_or(min_rank);
    let shift = min_rank.min(0);

    // Stable tie-break on insertion order keeps symmetric inputs from drifting.
    leaves.sort_unstable_by_key(|&(rank, ix, _)| (rank, ix));

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank - shift + 1) as usize];
    let mut visited: HashSet<&str> = HashSet::default();
    let mut stack: Vec<&str> = Vec::new();
    for &(_, _, start) in &leaves {
        stack.push(start);
        while let Some(v) = stack.pop() {
            if !visited.insert(v) || g.has_children(v) {
                continue;
            }
            let Some(rank) = g.node(v).and_then(|n| n.rank()) else {
                continue;
            };
            layers[(rank - shift) as usize].push(v.to_string());

            let successors = g.successors(v);
            stack.extend(successors.into_iter().rev().filter(|w| !visited.contains(w)));
        }
    }

    let layers = layers
        .into_iter()
        .enumerate()
        .map(|(ix, layer)| group_by_subgraph(g, ix as i32 + shift, layer))
        .collect();
    Layering::new(layers)
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey<'a> {
    Leaf(&'a str),
    Subgraph(&'a str),
}

struct Regroup<'a, 'g, N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    g: &'g Graph<N, E, G>,
    rank: i32,
    layer: &'a [String],
    chains: Vec<Vec<&'a str>>,
}

/// Reorders one rank so every subgraph's members are adjacent, keeping first-appearance order of
/// groups and of members within a group. A subgraph's border leaves for the rank, if any, are
/// moved to the two ends of its run.
fn group_by_subgraph<N, E, G>(g: &Graph<N, E, G>, rank: i32, layer: Vec<String>) -> Vec<String>
where
    N: Default + OrderNode + 'static,
    E: Default + 'static,
    G: Default,
{
    if !g.is_compound() || layer.iter().all(|v| g.parent(v).is_none()) {
        return layer;
    }

    let order = {
        let chains = layer
            .iter()
            .map(|v| {
                let mut chain = Vec::new();
                let mut cur = g.parent(v);
                while let Some(p) = cur {
                    if chain.contains(&p) {
                        break;
                    }
                    chain.push(p);
                    cur = g.parent(p);
                }
                chain.reverse();
                chain
            })
            .collect();
        let ctx = Regroup {
            g,
            rank,
            layer: &layer,
            chains,
        };
        let mut order = Vec::with_capacity(layer.len());
        ctx.regroup((0..layer.len()).collect(), 0, None, &mut order);
        order
    };
    order.into_iter().map(|i| layer[i].clone()).collect()
}

impl<'a, N, E, G> Regroup<'a, '_, N, E, G>
where
    N: Default + OrderNode + 'static,
    E: Default + 'static,
    G: Default,
{
    fn regroup(
        &self,
        items: Vec<usize>,
        depth: usize,
        borders: Option<(&str, &str)>,
        out: &mut Vec<usize>,
    ) {
        let mut groups: IndexMap<GroupKey<'a>, Vec<usize>> = IndexMap::new();
        for i in items {
            let key = match self.chains[i].get(depth) {
                Some(&sg) => GroupKey::Subgraph(sg),
                None => GroupKey::Leaf(self.layer[i].as_str()),
            };
            groups.entry(key).or_default().push(i);
        }

        let mut groups: Vec<(GroupKey<'a>, Vec<usize>)> = groups.into_iter().collect();
        if let Some((left, right)) = borders {
            let is_leaf = |key: &GroupKey<'_>, id: &str| *key == GroupKey::Leaf(id);
            if let Some(pos) = groups.iter().position(|(k, _)| is_leaf(k, left)) {
                let group = groups.remove(pos);
                groups.insert(0, group);
            }
            if let Some(pos) = groups.iter().position(|(k, _)| is_leaf(k, right)) {
                let group = groups.remove(pos);
                groups.push(group);
            }
        }

        for (key, members) in groups {
            match key {
                GroupKey::Leaf(_) => out.extend(members),
                GroupKey::Subgraph(sg) => {
                    let borders = self.g.node(sg).and_then(|n| {
                        Some((n.border_left_at(self.rank)?, n.border_right_at(self.rank)?))
                    });
                    self.regroup(members, depth + 1, borders, out);
                }
            }
        }
    }
}
