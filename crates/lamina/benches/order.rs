use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use lamina::graphlib::{Graph, GraphOptions};
use lamina::order::{self, OrderOptions};
use lamina::{EdgeLabel, GraphLabel, NodeLabel};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct LayeredSpec {
    ranks: usize,
    width: usize,
    edges: Vec<(usize, usize, f64)>,
    subgraph_every: Option<usize>,
}

impl LayeredSpec {
    fn id(&self, ix: usize) -> String {
        format!("r{}_n{}", ix / self.width, ix % self.width)
    }

    fn build(&self) -> Graph<NodeLabel, EdgeLabel, GraphLabel> {
        let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
            multigraph: true,
            compound: self.subgraph_every.is_some(),
        });
        g.set_graph(GraphLabel::default());

        for ix in 0..self.ranks * self.width {
            g.set_node(self.id(ix), NodeLabel::with_rank((ix / self.width) as i32));
            if let Some(every) = self.subgraph_every {
                let column = ix % self.width;
                if column % every == 0 {
                    g.set_parent(self.id(ix), format!("sg{}", column / every % 4));
                }
            }
        }
        for &(from, to, weight) in &self.edges {
            g.set_edge_with_label(self.id(from), self.id(to), EdgeLabel {
                weight,
                minlen: 1,
            });
        }
        g
    }
}

/// Adjacent-rank edges picked by a fixed linear congruential sequence so every run sees the same
/// graph.
fn build_layered_spec(ranks: usize, width: usize, fanout: usize) -> LayeredSpec {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = |bound: usize| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((state >> 33) as usize) % bound
    };

    let mut edges = Vec::new();
    for rank in 0..ranks.saturating_sub(1) {
        for col in 0..width {
            let from = rank * width + col;
            for _ in 0..fanout {
                let to = (rank + 1) * width + next(width);
                edges.push((from, to, 1.0 + next(3) as f64));
            }
        }
    }
    LayeredSpec {
        ranks,
        width,
        edges,
        subgraph_every: None,
    }
}

fn bench_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("order");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("flat_8x8_f2", build_layered_spec(8, 8, 2)),
        ("flat_16x24_f3", build_layered_spec(16, 24, 3)),
        ("compound_12x16_f2", LayeredSpec {
            subgraph_every: Some(3),
            ..build_layered_spec(12, 16, 2)
        }),
    ];

    for (name, spec) in &cases {
        group.bench_with_input(BenchmarkId::new("order::order", name), spec, |b, spec| {
            b.iter_batched(
                || spec.build(),
                |mut g| {
                    let summary = order::order(black_box(&mut g), OrderOptions::default());
                    black_box(summary.map(|s| s.crossings).unwrap_or_default());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_order);
criterion_main!(benches);
