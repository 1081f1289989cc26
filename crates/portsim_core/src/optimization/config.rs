//! Optimizer configuration

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;
use crate::model::Portfolio;
use crate::scenario::{DEFAULT_HORIZON_YEARS, Horizon, MAX_HORIZON_YEARS, ScenarioModel};

/// Complete configuration for a population search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Number of individuals, constant across generations
    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Fixed number of generations; there is no early stop
    #[serde(default = "default_generations")]
    pub generations: usize,

    /// Unit increments handed out at random to build each initial allocation
    #[serde(default = "default_increments")]
    pub increments: u32,

    /// Total every offspring is renormalized to
    #[serde(default = "default_notional")]
    pub notional: f64,

    /// Offspring weights are multiplied by a factor drawn from
    /// `[1 - spread, 1 + spread)`
    #[serde(default = "default_mutation_spread")]
    pub mutation_spread: f64,

    #[serde(default = "default_horizon_years")]
    pub horizon_years: i16,

    /// Scenario each generation is evaluated against
    #[serde(default)]
    pub model: ScenarioModel,

    /// Portfolio whose history seeds the Markov model (equal weight when unset)
    #[serde(default)]
    pub reference: Option<Portfolio>,

    /// Fixed date the horizon is anchored at (today when unset)
    #[serde(default)]
    pub anchor: Option<Date>,

    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_population_size() -> usize {
    100
}

fn default_generations() -> usize {
    2000
}

fn default_increments() -> u32 {
    100
}

fn default_notional() -> f64 {
    100_000.0
}

fn default_mutation_spread() -> f64 {
    0.05
}

fn default_horizon_years() -> i16 {
    DEFAULT_HORIZON_YEARS
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            generations: default_generations(),
            increments: default_increments(),
            notional: default_notional(),
            mutation_spread: default_mutation_spread(),
            horizon_years: default_horizon_years(),
            model: ScenarioModel::default(),
            reference: None,
            anchor: None,
            seed: None,
        }
    }
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.population_size == 0 {
            return Err(OptimizeError::Config(
                "population must have at least one individual".to_string(),
            ));
        }
        if self.generations == 0 {
            return Err(OptimizeError::Config(
                "at least one generation is required".to_string(),
            ));
        }
        if self.increments == 0 {
            return Err(OptimizeError::Config(
                "initial allocation needs at least one increment".to_string(),
            ));
        }
        if !self.notional.is_finite() || self.notional <= 0.0 {
            return Err(OptimizeError::Config(format!(
                "notional total must be positive, got {}",
                self.notional
            )));
        }
        if !(0.0..1.0).contains(&self.mutation_spread) {
            return Err(OptimizeError::Config(format!(
                "mutation spread must be in [0, 1), got {}",
                self.mutation_spread
            )));
        }
        let anchor = self.anchor.unwrap_or_else(|| jiff::Zoned::now().date());
        if Horizon::try_anchored(anchor, self.horizon_years).is_none() {
            return Err(OptimizeError::Config(format!(
                "horizon must be 1..={MAX_HORIZON_YEARS} years ending in a representable date, \
                 got {} years from {anchor}",
                self.horizon_years
            )));
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
