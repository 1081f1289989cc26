//! Genetic search for allocations that maximize the Sharpe ratio
//!
//! # Example
//!
//! ```ignore
//! use portsim_core::optimization::{OptimizerConfig, PopulationOptimizer};
//! use portsim_core::scenario::ScenarioModel;
//!
//! let config = OptimizerConfig {
//!     population_size: 50,
//!     generations: 200,
//!     model: ScenarioModel::block(),
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let result = PopulationOptimizer::new(config).run(
//!     &store,
//!     Some(Box::new(|report: &GenerationReport| println!("{}: {}", report.generation, report.best))),
//! )?;
//! println!("best: {}", result.best.portfolio);
//! ```

mod breeding;
mod config;
mod population;
mod result;

pub use breeding::{Mutation, breed, random_portfolio, recombine};
pub use config::OptimizerConfig;
pub use population::{PopulationOptimizer, ProgressCallback};
pub use result::{GenerationReport, Individual, OptimizationResult};
