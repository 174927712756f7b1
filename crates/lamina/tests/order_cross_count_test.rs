use lamina::NodeLabel;
use lamina::graphlib::{Graph, GraphOptions};
use lamina::order::{Layering, WeightLabel, cross_count};

fn new_graph() -> Graph<NodeLabel, WeightLabel, ()> {
    let mut g: Graph<NodeLabel, WeightLabel, ()> = Graph::new(GraphOptions::default());
    g.set_default_edge_label(WeightLabel::default);
    g
}

fn layering(layers: &[&[&str]]) -> Layering {
    Layering::from(layers.iter().map(|l| l.to_vec()).collect::<Vec<_>>())
}

#[test]
fn cross_count_returns_0_for_an_empty_layering() {
    let g = new_graph();
    assert_eq!(cross_count(&g, &Layering::default()), 0.0);
}

#[test]
fn cross_count_returns_0_for_a_layering_with_no_crossings() {
    let mut g = new_graph();
    g.set_edge("a1", "b1");
    g.set_edge("a2", "b2");
    assert_eq!(
        cross_count(&g, &layering(&[&["a1", "a2"], &["b1", "b2"]])),
        0.0
    );
}

#[test]
fn cross_count_returns_1_for_a_layering_with_1_crossing() {
    let mut g = new_graph();
    g.set_edge("a1", "b1");
    g.set_edge("a2", "b2");
    assert_eq!(
        cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"]])),
        1.0
    );
}

#[test]
fn cross_count_returns_a_weighted_crossing_count_for_a_layering_with_1_crossing() {
    let mut g = new_graph();
    g.set_edge_with_label("a1", "b1", WeightLabel { weight: 2.0 });
    g.set_edge_with_label("a2", "b2", WeightLabel { weight: 3.0 });
    assert_eq!(
        cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"]])),
        6.0
    );
}

#[test]
fn cross_count_calculates_crossings_across_layers() {
    let mut g = new_graph();
    g.set_path(&["a1", "b1", "c1"]);
    g.set_path(&["a2", "b2", "c2"]);
    assert_eq!(
        cross_count(
            &g,
            &layering(&[&["a1", "a2"], &["b2", "b1"], &["c1", "c2"]])
        ),
        2.0
    );
}

#[test]
fn cross_count_works_for_graph_1() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["d", "e", "c"]);
    g.set_path(&["a", "f", "i"]);
    g.set_edge("a", "e");
    assert_eq!(
        cross_count(&g, &layering(&[&["a", "d"], &["b", "e", "f"], &["c", "i"]])),
        1.0
    );
    assert_eq!(
        cross_count(&g, &layering(&[&["d", "a"], &["e", "b", "f"], &["c", "i"]])),
        0.0
    );
}

#[test]
fn cross_count_ignores_edges_that_skip_a_rank() {
    let mut g = new_graph();
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    g.set_edge("a", "x");
    assert_eq!(
        cross_count(&g, &layering(&[&["a", "b"], &["c", "d"], &["x"]])),
        1.0
    );
    assert_eq!(
        cross_count(&g, &layering(&[&["a", "b"], &["d", "c"], &["x"]])),
        0.0
    );
}

#[test]
fn cross_count_is_idempotent() {
    let mut g = new_graph();
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    let l = layering(&[&["a", "b"], &["c", "d"]]);
    let first = cross_count(&g, &l);
    assert_eq!(cross_count(&g, &l), first);
    assert_eq!(first, 1.0);
}

#[test]
fn cross_count_counts_inversions_seen_from_each_north_node_in_turn() {
    let mut g = new_graph();
    g.set_edge("a", "c");
    g.set_edge("b", "d");
    g.set_edge("b", "c");
    g.ensure_node("e");

    assert_eq!(
        cross_count(&g, &layering(&[&["a", "b"], &["c", "d"], &["e"]])),
        0.0
    );
    assert_eq!(
        cross_count(&g, &layering(&[&["a", "b"], &["d", "c"], &["e"]])),
        1.0
    );
}
