//! Forecast configuration

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::scenario::{DEFAULT_HORIZON_YEARS, Horizon, MAX_HORIZON_YEARS, ScenarioModel};

/// Settings for a Monte Carlo forecast of one portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of independent synthetic futures
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    #[serde(default = "ScenarioModel::block")]
    pub model: ScenarioModel,

    #[serde(default = "default_horizon_years")]
    pub horizon_years: i16,

    /// Percentiles to report, each in `1..=100`
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<u8>,

    /// Fixed date the horizon is anchored at (today when unset)
    #[serde(default)]
    pub anchor: Option<Date>,

    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_iterations() -> usize {
    10_000
}

fn default_horizon_years() -> i16 {
    DEFAULT_HORIZON_YEARS
}

fn default_percentiles() -> Vec<u8> {
    vec![50, 80, 90, 95, 99]
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            model: ScenarioModel::block(),
            horizon_years: default_horizon_years(),
            percentiles: default_percentiles(),
            anchor: None,
            seed: None,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.iterations == 0 {
            return Err(AnalysisError::Config(
                "forecast needs at least one iteration".to_string(),
            ));
        }
        let anchor = self.anchor.unwrap_or_else(|| jiff::Zoned::now().date());
        if Horizon::try_anchored(anchor, self.horizon_years).is_none() {
            return Err(AnalysisError::Config(format!(
                "horizon must be 1..={MAX_HORIZON_YEARS} years ending in a representable date, \
                 got {} years from {anchor}",
                self.horizon_years
            )));
        }
        if let Some(p) = self.percentiles.iter().find(|p| !(1..=100).contains(*p)) {
            return Err(AnalysisError::Config(format!(
                "percentile {p} is outside 1..=100"
            )));
        }
        if matches!(self.model, ScenarioModel::Historical) {
            return Err(AnalysisError::Config(
                "historical replay is deterministic; use backtest instead".to_string(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn horizon(&self) -> Horizon {
        match self.anchor {
            Some(anchor) => Horizon::anchored(anchor, self.horizon_years),
            None => Horizon::from_today(self.horizon_years),
        }
    }
}
