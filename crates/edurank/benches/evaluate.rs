//! Rating synthesis and ranking evaluation benchmarks.
//!
//! Run with: `cargo bench --bench evaluate`

mod common;

use common::criterion_config::default_criterion;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use edurank::eval::{EvalConfig, MostPopular, RankingEvaluator};
use edurank::testing::{synthetic_dataset, synthetic_interactions};
use edurank::{RatingConfig, TrainTestSplit};

// =============================================================================
// Rating
// =============================================================================

fn bench_rating(c: &mut Criterion) {
    let config = RatingConfig::default();
    let mut group = c.benchmark_group("rating/rate_interactions");

    for n_players in [100, 1_000] {
        let records = synthetic_interactions(n_players, 200, 0.1, 42);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_players), &records, |b, records| {
            b.iter(|| black_box(config.rate_interactions(black_box(records))))
        });
    }
    group.finish();
}

// =============================================================================
// Evaluation
// =============================================================================

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval/most_popular");

    for n_players in [500, 5_000] {
        let ds = synthetic_dataset(n_players, 300, 0.05, 7).unwrap();
        let (train, test) = TrainTestSplit::default().split_sparse(&ds).unwrap();
        let model = MostPopular::fit(&train);

        for batch_size in [100, 1_000] {
            let config = EvalConfig::builder()
                .k(10)
                .batch_size(batch_size)
                .build()
                .unwrap();
            let evaluator = RankingEvaluator::new(config);

            group.throughput(Throughput::Elements(n_players as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("batch_{batch_size}"), n_players),
                &(&train, &test),
                |b, (train, test)| {
                    b.iter(|| black_box(evaluator.evaluate(&model, train, test).unwrap()))
                },
            );
        }
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = default_criterion();
    targets = bench_rating, bench_evaluate
}
criterion_main!(benches);
