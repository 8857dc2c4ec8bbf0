use chainviz_analysis::{ChainStats, expected_steps};
use chainviz_core::{Chain, layout};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

const SIZES: [usize; 4] = [10, 50, 200, 500];

/// Ladder with a restart edge on every rung: `i -> i + 1` and `i -> 0`,
/// each with probability 1/2. The last node absorbs.
fn restart_ladder(n: usize) -> Chain {
    let mut chain = Chain::with_nodes(n);
    chain.add_edge(0, 1, 1.0).expect("in range");
    for i in 1..n - 1 {
        chain.add_edge(i, i + 1, 0.5).expect("in range");
        chain.add_edge(i, 0, 0.5).expect("in range");
    }
    chain
}

fn bench_expected_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis.expected_steps");

    for n in SIZES {
        let chain = restart_ladder(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &chain, |b, chain| {
            b.iter(|| black_box(expected_steps(chain).expect("absorbing").len()));
        });
    }

    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis.layout");

    for n in SIZES {
        let chain = restart_ladder(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &chain, |b, chain| {
            b.iter(|| {
                let mut chain = chain.clone();
                black_box(layout(&mut chain).expect("absorbing").layer_count)
            });
        });
    }

    group.finish();
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis.stats");

    for n in SIZES {
        let chain = restart_ladder(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &chain, |b, chain| {
            b.iter(|| black_box(ChainStats::from_chain(chain).scc_count));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_expected_steps, bench_layout, bench_stats);
criterion_main!(benches);
