//! Criterion benchmarks for portsim_core scenarios and optimizer
//!
//! Run with: cargo bench -p portsim_core

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use portsim_core::analysis::{ForecastConfig, forecast};
use portsim_core::optimization::{OptimizerConfig, PopulationOptimizer};
use portsim_core::scenario::{
    BlockBootstrap, HistoricalReplay, Horizon, MarkovBootstrap, ScenarioModel, TransitionGraph,
};
use portsim_core::{Portfolio, SeriesStore, TimeSeries, evaluate};

fn create_store(assets: usize, months: usize) -> SeriesStore {
    (0..assets)
        .map(|a| {
            let values: Vec<f64> = (0..months)
                .map(|m| {
                    let phase = (m * (a + 3)) as f64 / 7.0;
                    0.004 + 0.03 * phase.sin()
                })
                .collect();
            TimeSeries::monthly(
                format!("ASSET{a}"),
                jiff::civil::date(1990, 1, 31),
                &values,
            )
        })
        .collect()
}

fn horizon() -> Horizon {
    Horizon::anchored(jiff::civil::date(2025, 1, 1), 30)
}

fn reference(store: &SeriesStore) -> TimeSeries {
    let portfolio = Portfolio::equal_weight(store.names(), 1.0).expect("non-empty store");
    evaluate(&portfolio, &mut HistoricalReplay::new(store)).expect("reference evaluation")
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    for assets in [2, 8, 32] {
        let store = create_store(assets, 420);
        let portfolio = Portfolio::equal_weight(store.names(), 100_000.0).expect("portfolio");

        group.bench_with_input(BenchmarkId::new("historical", assets), &assets, |b, _| {
            b.iter(|| {
                let mut replay = HistoricalReplay::new(&store);
                black_box(evaluate(&portfolio, &mut replay))
            });
        });

        group.bench_with_input(BenchmarkId::new("block", assets), &assets, |b, _| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                let mut provider =
                    BlockBootstrap::new(&store, horizon(), 12, SmallRng::seed_from_u64(seed))
                        .expect("block bootstrap");
                black_box(evaluate(&portfolio, &mut provider))
            });
        });
    }

    group.finish();
}

fn bench_markov(c: &mut Criterion) {
    let store = create_store(4, 420);
    let reference = reference(&store);

    c.bench_function("markov_graph_build", |b| {
        b.iter(|| black_box(TransitionGraph::from_series(&reference)));
    });

    let graph = Arc::new(TransitionGraph::from_series(&reference).expect("graph"));
    let portfolio = Portfolio::equal_weight(store.names(), 100_000.0).expect("portfolio");
    c.bench_function("markov_evaluate", |b| {
        let mut seed = 0;
        b.iter(|| {
            seed += 1;
            let mut provider = MarkovBootstrap::from_graph(
                Arc::clone(&graph),
                horizon(),
                SmallRng::seed_from_u64(seed),
            )
            .expect("markov bootstrap");
            black_box(evaluate(&portfolio, &mut provider))
        });
    });
}

fn bench_forecast(c: &mut Criterion) {
    let mut group = c.benchmark_group("forecast");
    group.sample_size(10);

    let store = create_store(4, 420);
    let portfolio = Portfolio::equal_weight(store.names(), 100_000.0).expect("portfolio");

    for iterations in [100, 1000] {
        let config = ForecastConfig {
            iterations,
            anchor: Some(jiff::civil::date(2025, 1, 1)),
            seed: Some(42),
            ..Default::default()
        };
        group.bench_with_input(
            BenchmarkId::new("block", iterations),
            &iterations,
            |b, _| {
                b.iter(|| black_box(forecast(&portfolio, &store, &config)));
            },
        );
    }

    group.finish();
}

fn bench_optimizer(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimizer");
    group.sample_size(10);

    let store = create_store(8, 420);
    for model in [ScenarioModel::block(), ScenarioModel::Markov] {
        let config = OptimizerConfig {
            population_size: 50,
            generations: 10,
            model,
            anchor: Some(jiff::civil::date(2025, 1, 1)),
            seed: Some(42),
            ..Default::default()
        };
        let optimizer = PopulationOptimizer::new(config);
        group.bench_function(BenchmarkId::new("run", model.label()), |b| {
            b.iter(|| black_box(optimizer.run(&store, None)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_markov,
    bench_forecast,
    bench_optimizer
);
criterion_main!(benches);
