use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dsi_progress_logger::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use webgraph_dagpart::algo::blocks::{grow_blocks, GrowthParams};
use webgraph_dagpart::algo::fwbw::forward_backward;
use webgraph_dagpart::prelude::*;
use webgraph_dagpart::threads;

const NUM_SAMPLES: usize = 10;
const GRAPH_SIZES: [usize; 2] = [10_000, 100_000];

/// A random graph with average outdegree 4 plus a cycle through half of the
/// nodes.
fn random_graph(num_nodes: usize) -> ArcGraph {
    let mut rng = SmallRng::seed_from_u64(0);
    let mut arcs = (0..num_nodes / 2)
        .map(|node| (node, (node + 1) % (num_nodes / 2)))
        .collect::<Vec<_>>();
    arcs.extend(
        (0..num_nodes * 4)
            .map(|_| (rng.random_range(0..num_nodes), rng.random_range(0..num_nodes))),
    );
    ArcGraph::from_arcs(num_nodes, arcs)
}

pub fn bench_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decomposition phases");
    group.sampling_mode(criterion::SamplingMode::Flat);
    group.sample_size(NUM_SAMPLES);
    let thread_pool = threads![];

    for num_nodes in GRAPH_SIZES {
        let graph = random_graph(num_nodes);
        let parameter = format!("random ({} nodes)", num_nodes);
        group.throughput(Throughput::Elements(graph.num_arcs() as u64));

        group.bench_with_input(
            BenchmarkId::new("Forward-backward", &parameter),
            &graph,
            |b, graph| {
                b.iter_with_large_drop(|| {
                    forward_backward(graph, 0, 1000, &thread_pool, no_logging![]).unwrap()
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("Block growth", &parameter),
            &graph,
            |b, graph| {
                b.iter_with_large_drop(|| {
                    grow_blocks(
                        graph,
                        |node| !graph.is_isolated(node),
                        GrowthParams {
                            num_roots: 100,
                            max_level: 10,
                            stop_ratio: 0.1,
                            max_iterations: 1000,
                        },
                        &thread_pool,
                        no_logging![],
                    )
                    .unwrap()
                })
            },
        );

        let dir = tempfile::tempdir().unwrap();
        let pipeline = PipelineConfig::new(dir.path().join("graph"))
            .with_pivot(Some(0))
            .with_num_roots(100)
            .build()
            .unwrap();
        group.bench_with_input(
            BenchmarkId::new("Pipeline", &parameter),
            &graph,
            |b, graph| b.iter_with_large_drop(|| pipeline.run(graph, no_logging![]).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_phases);
criterion_main!(benches);
