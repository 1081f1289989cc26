use std::sync::Arc;

use rand::rngs::{SmallRng, StdRng};
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, ScenarioError};
use crate::evaluate::evaluate;
use crate::metrics::SeriesStats;
use crate::model::{Portfolio, SeriesStore, TimeSeries};
use crate::scenario::{HistoricalReplay, Horizon, ScenarioModel, TransitionGraph};

use super::config::ForecastConfig;

const MAX_BATCH_SIZE: usize = 100;

/// A portfolio's result against the loaded history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backtest {
    pub series: TimeSeries,
    pub stats: SeriesStats,
}

/// Evaluate `portfolio` once against [`HistoricalReplay`].
pub fn backtest(portfolio: &Portfolio, store: &SeriesStore) -> Result<Backtest, AnalysisError> {
    let series = evaluate(portfolio, &mut HistoricalReplay::new(store))?;
    let stats = series.stats();
    Ok(Backtest { series, stats })
}

/// One reported row of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileRow {
    pub percentile: u8,
    pub stats: SeriesStats,
}

impl std::fmt::Display for PercentileRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[P{}] {}", self.percentile, self.stats)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub iterations: usize,
    pub rows: Vec<PercentileRow>,
}

/// Evaluate `portfolio` against `config.iterations` independent synthetic
/// futures and report the requested Sharpe-ratio percentiles.
///
/// Outcomes are sorted ascending by Sharpe ratio; percentile `p` reports the
/// outcome at index `len * (100 - p) / 100`, i.e. the result that `p` percent
/// of futures match or beat.
pub fn forecast(
    portfolio: &Portfolio,
    store: &SeriesStore,
    config: &ForecastConfig,
) -> Result<ForecastSummary, AnalysisError> {
    config.validate()?;
    let horizon = config.horizon();

    // The Markov graph is seeded from the portfolio's own history
    let graph = match config.model {
        ScenarioModel::Markov => {
            let reference = evaluate(portfolio, &mut HistoricalReplay::new(store))?;
            Some(Arc::new(TransitionGraph::from_series(&reference)?))
        }
        _ => None,
    };

    let mut master = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let num_batches = config.iterations.div_ceil(MAX_BATCH_SIZE);
    let batch_seeds: Vec<u64> = (0..num_batches).map(|_| master.next_u64()).collect();

    let run_batch = |(i, seed): (usize, &u64)| -> Result<Vec<SeriesStats>, ScenarioError> {
        let mut rng = SmallRng::seed_from_u64(*seed);
        let batch_size = if i == num_batches - 1 {
            config.iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };
        (0..batch_size)
            .map(|_| {
                let iteration_rng = SmallRng::seed_from_u64(rng.next_u64());
                run_once(portfolio, store, &config.model, graph.as_ref(), horizon, iteration_rng)
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Result<Vec<SeriesStats>, ScenarioError>> =
        batch_seeds.par_iter().enumerate().map(run_batch).collect();

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Result<Vec<SeriesStats>, ScenarioError>> =
        batch_seeds.iter().enumerate().map(run_batch).collect();

    let mut outcomes = Vec::with_capacity(config.iterations);
    for batch in batches {
        outcomes.extend(batch?);
    }
    outcomes.sort_by(|a, b| a.rank_key().total_cmp(&b.rank_key()));

    tracing::debug!(
        iterations = outcomes.len(),
        model = config.model.label(),
        "forecast complete"
    );

    Ok(ForecastSummary {
        iterations: outcomes.len(),
        rows: percentile_rows(&outcomes, &config.percentiles),
    })
}

fn run_once(
    portfolio: &Portfolio,
    store: &SeriesStore,
    model: &ScenarioModel,
    graph: Option<&Arc<TransitionGraph>>,
    horizon: Horizon,
    rng: SmallRng,
) -> Result<SeriesStats, ScenarioError> {
    let mut scenario = model.build(store, graph, horizon, rng)?;
    Ok(evaluate(portfolio, &mut scenario)?.stats())
}

/// Rows for `percentiles` over outcomes sorted ascending.
fn percentile_rows(sorted: &[SeriesStats], percentiles: &[u8]) -> Vec<PercentileRow> {
    if sorted.is_empty() {
        return Vec::new();
    }
    percentiles
        .iter()
        .map(|&percentile| {
            let index = sorted.len() * (100 - usize::from(percentile)) / 100;
            PercentileRow {
                percentile,
                stats: sorted[index.min(sorted.len() - 1)],
            }
        })
        .collect()
}
