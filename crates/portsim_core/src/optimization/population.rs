//! Generational search over allocations
//!
//! Each generation draws one synthetic future, records it for every asset,
//! and evaluates the whole population against that same recording. The
//! population is then ranked by Sharpe ratio and its lower half replaced by
//! offspring of the upper half.

use std::sync::Arc;

use rand::rngs::{SmallRng, StdRng};
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{OptimizeError, ScenarioError};
use crate::evaluate::evaluate;
use crate::model::{Portfolio, SeriesStore};
use crate::scenario::{HistoricalReplay, ScenarioModel, TransitionGraph, record};

use super::breeding::{Mutation, breed, random_portfolio};
use super::config::OptimizerConfig;
use super::result::{GenerationReport, Individual, OptimizationResult};

/// Progress callback invoked once per ranked generation
pub type ProgressCallback = Box<dyn Fn(&GenerationReport) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct PopulationOptimizer {
    config: OptimizerConfig,
}

impl PopulationOptimizer {
    #[must_use]
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Run the configured number of generations over the assets of `store`.
    ///
    /// Failing to build or record a generation's scenario aborts the run. A
    /// failure evaluating one individual only drops that individual to the
    /// bottom of the ranking.
    pub fn run(
        &self,
        store: &SeriesStore,
        progress_callback: Option<ProgressCallback>,
    ) -> Result<OptimizationResult, OptimizeError> {
        let config = &self.config;
        config.validate()?;
        if store.is_empty() {
            return Err(OptimizeError::Config("no series loaded".to_string()));
        }

        let names: Vec<String> = store.names().map(str::to_string).collect();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let horizon = config.horizon();
        let mutation = Mutation::new(config.mutation_spread);
        let graph = self.reference_graph(store, &names)?;

        let mut population: Vec<Individual> = (0..config.population_size)
            .map(|_| {
                Individual::new(random_portfolio(
                    &names,
                    config.increments,
                    config.notional,
                    &mut rng,
                ))
            })
            .collect();

        tracing::info!(
            population = config.population_size,
            generations = config.generations,
            assets = names.len(),
            model = config.model.label(),
            "starting optimization"
        );

        let mut best_sharpe_history = Vec::with_capacity(config.generations);
        for generation in 0..config.generations {
            let scenario_rng = SmallRng::seed_from_u64(rng.next_u64());
            let mut scenario = config
                .model
                .build(store, graph.as_ref(), horizon, scenario_rng)?;
            let shared = record(names.iter().map(String::as_str), &mut scenario)?;

            let failed = evaluate_population(&mut population, &shared);
            population.sort_by(|a, b| a.rank_key().total_cmp(&b.rank_key()));

            let best = population
                .last()
                .cloned()
                .ok_or_else(|| OptimizeError::Config("population is empty".to_string()))?;
            best_sharpe_history.push(best.rank_key());

            tracing::debug!(
                generation,
                failed,
                sharpe = best.rank_key(),
                best = %best.portfolio,
                "generation ranked"
            );
            if let Some(ref callback) = progress_callback {
                callback(&GenerationReport {
                    generation,
                    best,
                    failed,
                });
            }

            if generation + 1 < config.generations {
                breed(&mut population, config.notional, &mutation, &mut rng);
            }
        }

        let best = population
            .pop()
            .ok_or_else(|| OptimizeError::Config("population is empty".to_string()))?;

        Ok(OptimizationResult {
            best,
            generations: config.generations,
            best_sharpe_history,
        })
    }

    /// Markov graph built from the reference portfolio's history, when the
    /// configured model needs one.
    fn reference_graph(
        &self,
        store: &SeriesStore,
        names: &[String],
    ) -> Result<Option<Arc<TransitionGraph>>, OptimizeError> {
        if !matches!(self.config.model, ScenarioModel::Markov) {
            return Ok(None);
        }
        let reference = match &self.config.reference {
            Some(portfolio) => portfolio.clone(),
            None => Portfolio::equal_weight(names.iter().map(String::as_str), self.config.notional)?,
        };
        let series = evaluate(&reference, &mut HistoricalReplay::new(store))?;
        let graph = TransitionGraph::from_series(&series)?;
        tracing::debug!(
            states = graph.len(),
            months = series.len(),
            reference = %reference,
            "built transition graph"
        );
        Ok(Some(Arc::new(graph)))
    }
}

/// Evaluate every individual against `shared`, returning the failure count.
fn evaluate_population(population: &mut [Individual], shared: &SeriesStore) -> usize {
    #[cfg(feature = "parallel")]
    let failed = population
        .par_iter_mut()
        .map(|individual| evaluate_individual(individual, shared))
        .filter(|ok| !ok)
        .count();

    #[cfg(not(feature = "parallel"))]
    let failed = population
        .iter_mut()
        .map(|individual| evaluate_individual(individual, shared))
        .filter(|ok| !ok)
        .count();

    failed
}

fn evaluate_individual(individual: &mut Individual, shared: &SeriesStore) -> bool {
    let result: Result<_, ScenarioError> =
        evaluate(&individual.portfolio, &mut HistoricalReplay::new(shared));
    match result {
        Ok(series) => {
            individual.stats = Some(series.stats());
            true
        }
        Err(e) => {
            tracing::warn!(portfolio = %individual.portfolio, error = %e, "evaluation failed");
            individual.stats = None;
            false
        }
    }
}
