use lamina::NodeLabel;
use lamina::graphlib::{Graph, GraphOptions};
use lamina::order::{
    Barycenter, BarycenterEntry, LayerGraph, Relationship, WeightLabel, barycenter,
    build_layer_graph,
};

fn new_graph() -> Graph<NodeLabel, WeightLabel, ()> {
    let mut g: Graph<NodeLabel, WeightLabel, ()> = Graph::new(GraphOptions::default());
    g.set_default_node_label(|| NodeLabel::with_rank(1));
    g.set_default_edge_label(WeightLabel::default);
    g
}

fn fixed(g: &mut Graph<NodeLabel, WeightLabel, ()>, v: &str, order: usize) {
    g.set_node(v, NodeLabel {
        rank: Some(0),
        order: Some(order),
        ..Default::default()
    });
}

fn barycenters(
    g: &Graph<NodeLabel, WeightLabel, ()>,
    movable: &[&str],
) -> Vec<(String, Option<Barycenter>)> {
    let lg: LayerGraph = build_layer_graph(g, 1, Relationship::InEdges);
    let ixs: Vec<_> = movable
        .iter()
        .map(|v| lg.find(v).expect("movable node"))
        .collect();
    let order_of = |v: &str| g.node(v).and_then(|n| n.order);
    barycenter(&lg, &ixs, &order_of)
        .into_iter()
        .map(|BarycenterEntry { v, barycenter }| (lg.id(v).to_string(), barycenter))
        .collect()
}

#[test]
fn barycenter_assigns_an_undefined_barycenter_for_a_node_with_no_predecessors() {
    let mut g = new_graph();
    g.ensure_node("x");

    assert_eq!(barycenters(&g, &["x"]), vec![("x".to_string(), None)]);
}

#[test]
fn barycenter_assigns_the_position_of_the_sole_predecessors() {
    let mut g = new_graph();
    fixed(&mut g, "a", 2);
    g.set_edge("a", "x");

    assert_eq!(barycenters(&g, &["x"]), vec![(
        "x".to_string(),
        Some(Barycenter {
            value: 2.0,
            weight: 1.0
        })
    )]);
}

#[test]
fn barycenter_assigns_the_average_of_multiple_predecessors() {
    let mut g = new_graph();
    fixed(&mut g, "a", 2);
    fixed(&mut g, "b", 4);
    g.set_edge("a", "x");
    g.set_edge("b", "x");

    assert_eq!(barycenters(&g, &["x"]), vec![(
        "x".to_string(),
        Some(Barycenter {
            value: 3.0,
            weight: 2.0
        })
    )]);
}

#[test]
fn barycenter_takes_into_account_the_weight_of_edges() {
    let mut g = new_graph();
    fixed(&mut g, "a", 2);
    fixed(&mut g, "b", 4);
    g.set_edge_with_label("a", "x", WeightLabel { weight: 3.0 });
    g.set_edge("b", "x");

    assert_eq!(barycenters(&g, &["x"]), vec![(
        "x".to_string(),
        Some(Barycenter {
            value: 2.5,
            weight: 4.0
        })
    )]);
}

#[test]
fn barycenter_calculates_barycenters_for_all_nodes_in_the_movable_layer() {
    let mut g = new_graph();
    fixed(&mut g, "a", 1);
    fixed(&mut g, "b", 2);
    fixed(&mut g, "c", 4);
    g.set_edge("a", "x");
    g.set_edge("b", "x");
    g.ensure_node("y");
    g.set_edge_with_label("a", "z", WeightLabel { weight: 2.0 });
    g.set_edge("c", "z");

    assert_eq!(barycenters(&g, &["x", "y", "z"]), vec![
        (
            "x".to_string(),
            Some(Barycenter {
                value: 1.5,
                weight: 2.0
            })
        ),
        ("y".to_string(), None),
        (
            "z".to_string(),
            Some(Barycenter {
                value: 2.0,
                weight: 3.0
            })
        ),
    ]);
}

#[test]
fn barycenter_treats_zero_total_weight_as_undefined() {
    let mut g = new_graph();
    fixed(&mut g, "a", 3);
    g.set_edge_with_label("a", "x", WeightLabel { weight: 0.0 });

    assert_eq!(barycenters(&g, &["x"]), vec![("x".to_string(), None)]);
}

#[test]
fn barycenter_combine_weights_both_sides_and_skips_empty_ones() {
    let a = Barycenter {
        value: 2.0,
        weight: 3.0,
    };
    let b = Barycenter {
        value: 1.0,
        weight: 2.0,
    };
    assert_eq!(
        Barycenter::combine(Some(a), Some(b)),
        Some(Barycenter {
            value: (2.0 * 3.0 + 1.0 * 2.0) / (3.0 + 2.0),
            weight: 5.0
        })
    );
    assert_eq!(Barycenter::combine(None, Some(b)), Some(b));
    assert_eq!(
        Barycenter::combine(
            Some(Barycenter {
                value: 9.0,
                weight: 0.0
            }),
            None
        ),
        None
    );
}
