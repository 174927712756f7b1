use lamina::graphlib::{Graph, GraphOptions};
use lamina::order::{Layering, WeightLabel};
use lamina::util::{self, Direction};
use lamina::{EdgeLabel, GraphLabel, NodeLabel};

fn multigraph() -> Graph<NodeLabel, WeightLabel, ()> {
    let mut g: Graph<NodeLabel, WeightLabel, ()> = Graph::new(GraphOptions {
        multigraph: true,
        compound: false,
    });
    g.set_default_edge_label(WeightLabel::default);
    g
}

fn ranked(ranks: &[(&str, i32)]) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
    let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
        multigraph: false,
        compound: true,
    });
    for &(v, rank) in ranks {
        g.set_node(v, NodeLabel::with_rank(rank));
    }
    g
}

fn rank_of<E: Default + 'static, G: Default>(g: &Graph<NodeLabel, E, G>, v: &str) -> Option<i32> {
    g.node(v).and_then(|n| n.rank)
}

#[test]
fn util_aggregate_weights_sums_parallel_edges() {
    let mut g = multigraph();
    g.set_edge_named("a", "b", Some("x"), Some(WeightLabel { weight: 1.0 }));
    g.set_edge_named("a", "b", Some("y"), Some(WeightLabel { weight: 2.0 }));
    g.set_edge_named("a", "c", None::<String>, Some(WeightLabel { weight: 4.0 }));

    let out = util::aggregate_weights(&g, "a", Direction::Successors);
    assert_eq!(out.into_iter().collect::<Vec<_>>(), vec![
        ("b".to_string(), 3.0),
        ("c".to_string(), 4.0)
    ]);

    let into_b = util::aggregate_weights(&g, "b", Direction::Predecessors);
    assert_eq!(into_b.get("a"), Some(&3.0));
}

#[test]
fn util_aggregate_weights_is_empty_without_edges() {
    let mut g = multigraph();
    g.ensure_node("a");
    g.set_edge("b", "a");

    assert!(util::aggregate_weights(&g, "a", Direction::Successors).is_empty());
    assert!(util::aggregate_weights(&g, "missing", Direction::Predecessors).is_empty());
}

#[test]
fn util_successor_and_predecessor_weights_cover_every_node() {
    let mut g = multigraph();
    g.set_edge_named("a", "b", Some("x"), Some(WeightLabel { weight: 2.0 }));
    g.set_edge_named("a", "b", Some("y"), Some(WeightLabel { weight: 3.0 }));
    g.set_edge("c", "b");

    let succ = util::successor_weights(&g);
    assert_eq!(succ.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(succ["a"].get("b"), Some(&5.0));
    assert!(succ["b"].is_empty());

    let pred = util::predecessor_weights(&g);
    assert_eq!(pred["b"].get("a"), Some(&5.0));
    assert_eq!(pred["b"].get("c"), Some(&1.0));
}

#[test]
fn util_build_layer_matrix_groups_nodes_by_rank_and_order() {
    let mut g = ranked(&[]);
    for (v, rank, order) in [("a", 0, 0), ("b", 0, 1), ("c", 1, 1), ("d", 1, 0), ("e", 2, 0)] {
        g.set_node(v, NodeLabel {
            rank: Some(rank),
            order: Some(order),
            ..Default::default()
        });
    }
    g.set_parent("a", "sg");

    let layering = util::build_layer_matrix(&g);
    assert_eq!(
        layering,
        Layering::from(vec![vec!["a", "b"], vec!["d", "c"], vec!["e"]])
    );
}

#[test]
fn util_build_layer_matrix_leaves_gaps_as_empty_ranks() {
    let g = ranked(&[("a", 0), ("b", 2)]);
    let layering = util::build_layer_matrix(&g);
    assert_eq!(layering.len(), 3);
    assert!(layering.rank(1).is_empty());
    assert_eq!(layering.rank(7), &[] as &[String]);
}

#[test]
fn util_max_rank_ignores_unranked_nodes() {
    let mut g = ranked(&[("a", 1), ("b", 4)]);
    g.ensure_node("c");
    assert_eq!(util::max_rank(&g), Some(4));
    assert_eq!(util::max_rank(&ranked(&[])), None);
}

#[test]
fn util_normalize_ranks_adjusts_ranks_such_that_all_are_gte_0_and_at_least_one_is_0() {
    let mut g = ranked(&[("a", 3), ("b", 2), ("c", 4)]);
    util::normalize_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), Some(1));
    assert_eq!(rank_of(&g, "b"), Some(0));
    assert_eq!(rank_of(&g, "c"), Some(2));
}

#[test]
fn util_normalize_ranks_works_for_negative_ranks() {
    let mut g = ranked(&[("a", -3), ("b", -2)]);
    util::normalize_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), Some(0));
    assert_eq!(rank_of(&g, "b"), Some(1));
}

#[test]
fn util_normalize_ranks_does_not_assign_a_rank_to_subgraphs() {
    let mut g = ranked(&[("a", 0)]);
    g.set_parent("a", "sg");
    util::normalize_ranks(&mut g);
    assert_eq!(rank_of(&g, "sg"), None);
    assert_eq!(rank_of(&g, "a"), Some(0));
}

#[test]
fn util_remove_empty_ranks_removes_border_ranks_without_any_nodes() {
    let mut g = ranked(&[("a", 0), ("b", 4)]);
    g.set_graph(GraphLabel {
        node_rank_factor: Some(4),
    });
    util::remove_empty_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), Some(0));
    assert_eq!(rank_of(&g, "b"), Some(1));
}

#[test]
fn util_remove_empty_ranks_does_not_remove_non_border_ranks() {
    let mut g = ranked(&[("a", 0), ("b", 8)]);
    g.set_graph(GraphLabel {
        node_rank_factor: Some(4),
    });
    util::remove_empty_ranks(&mut g);
    assert_eq!(rank_of(&g, "a"), Some(0));
    assert_eq!(rank_of(&g, "b"), Some(2));
}

#[test]
fn util_remove_empty_ranks_is_a_no_op_without_a_factor() {
    let mut g = ranked(&[("a", 0), ("b", 4)]);
    util::remove_empty_ranks(&mut g);
    assert_eq!(rank_of(&g, "b"), Some(4));
}

#[test]
fn util_simplify_collapses_multi_edges() {
    let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
        multigraph: true,
        compound: false,
    });
    g.set_edge_with_label("a", "b", EdgeLabel {
        weight: 1.0,
        minlen: 1,
    });
    g.set_edge_named(
        "a",
        "b",
        Some("multi"),
        Some(EdgeLabel {
            weight: 2.0,
            minlen: 2,
        }),
    );
    g.set_graph(GraphLabel {
        node_rank_factor: Some(3),
    });

    let g2 = util::simplify(&g);
    assert!(!g2.is_multigraph());
    assert_eq!(g2.edge_count(), 1);
    assert_eq!(
        g2.edge("a", "b", None),
        Some(&EdgeLabel {
            weight: 3.0,
            minlen: 2,
        })
    );
    assert_eq!(g2.graph().node_rank_factor, Some(3));
}

#[test]
fn util_as_non_compound_graph_drops_subgraph_nodes() {
    let mut g = ranked(&[("a", 0), ("b", 1)]);
    g.set_parent("a", "sg");
    g.set_edge("a", "b");

    let flat = util::as_non_compound_graph(&g);
    assert!(!flat.is_compound());
    assert_eq!(flat.nodes().collect::<Vec<_>>(), vec!["a", "b"]);
    assert!(flat.has_edge("a", "b", None));
    assert_eq!(flat.parent("a"), None);
}

#[test]
fn util_time_returns_the_value_of_the_closure() {
    assert_eq!(util::time("answer", || 6 * 7), 42);
}
