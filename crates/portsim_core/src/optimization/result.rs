//! Optimization result types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::SeriesStats;
use crate::model::Portfolio;

/// A candidate allocation and its statistics for the current generation.
///
/// Displays as `allocation (returns/volatility/sharpe)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub portfolio: Portfolio,
    /// `None` until evaluated, or when the evaluation failed
    pub stats: Option<SeriesStats>,
}

impl Individual {
    #[must_use]
    pub fn new(portfolio: Portfolio) -> Self {
        Self {
            portfolio,
            stats: None,
        }
    }

    /// Sort key: Sharpe ratio, with failed or degenerate evaluations last.
    #[must_use]
    pub fn rank_key(&self) -> f64 {
        self.stats.map_or(f64::NEG_INFINITY, |s| s.rank_key())
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.stats {
            Some(s) => write!(
                f,
                "{} ({:4.1}/{:4.1}/{:4.2})",
                self.portfolio, s.returns, s.volatility, s.sharpe_ratio
            ),
            None => write!(f, "{} (not evaluated)", self.portfolio),
        }
    }
}

/// Progress notification after each generation is ranked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Zero-based generation index
    pub generation: usize,
    pub best: Individual,
    /// Individuals whose evaluation failed this generation
    pub failed: usize,
}

/// Final result from an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Best individual of the final generation
    pub best: Individual,

    /// Number of generations performed
    pub generations: usize,

    /// Best Sharpe ratio of each generation, in order
    pub best_sharpe_history: Vec<f64>,
}
