//! Portfolio allocation evaluation library
//!
//! This crate evaluates asset-allocation portfolios against historical and
//! synthetic monthly market scenarios, and searches for allocations with a
//! better risk-adjusted return. It supports:
//! - Historical replay of a loaded series store
//! - Block-bootstrap resampling with regime persistence
//! - Markov-chain bootstrap over discretized monthly returns
//! - Annualized return, volatility and Sharpe-ratio metrics
//! - Monte Carlo forecasts with percentile summaries
//! - A genetic population optimizer
//!
//! # Example
//!
//! ```ignore
//! use portsim_core::{Portfolio, Position, evaluate};
//! use portsim_core::scenario::HistoricalReplay;
//!
//! let portfolio = Portfolio::new(vec![
//!     Position::new("WORLD", 60_000.0),
//!     Position::new("BONDS", 40_000.0),
//! ])?;
//! let series = evaluate(&portfolio, &mut HistoricalReplay::new(&store))?;
//! println!("{}", series.stats());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod error;
pub mod evaluate;
pub mod metrics;
pub mod optimization;
pub mod scenario;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{AnalysisError, OptimizeError, PortfolioError, ScenarioError};
pub use evaluate::evaluate;
pub use metrics::SeriesStats;
pub use model::{Datum, Portfolio, Position, SeriesStore, TimeSeries};
pub use scenario::{ScenarioModel, ScenarioProvider};
