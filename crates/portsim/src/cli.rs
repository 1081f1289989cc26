use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use portsim_core::analysis::ForecastConfig;
use portsim_core::optimization::OptimizerConfig;
use portsim_core::{Portfolio, PortfolioError, Position, ScenarioModel};

#[derive(Parser, Debug)]
#[command(name = "portsim")]
#[command(about = "Evaluate and optimize portfolio allocations against historical and synthetic markets")]
pub struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate a portfolio against the loaded history
    Backtest(BacktestArgs),
    /// Evaluate a portfolio against many synthetic futures
    Forecast(ForecastArgs),
    /// Search for the allocation with the best Sharpe ratio
    Optimize(OptimizeArgs),
}

#[derive(ClapArgs, Debug)]
pub struct InputArgs {
    /// CSV file containing historic monthly returns
    #[arg(short, long, default_value = "history.csv")]
    pub input: PathBuf,

    /// YAML file with forecast/optimizer settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Position as "name:weight" (repeatable)
    #[arg(long = "pos", value_parser = parse_position)]
    pub positions: Vec<Position>,
}

#[derive(ClapArgs, Debug)]
pub struct ForecastArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Position as "name:weight" (repeatable)
    #[arg(long = "pos", value_parser = parse_position)]
    pub positions: Vec<Position>,

    /// Number of synthetic futures
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Scenario model; without it (and without --config) both block and markov run
    #[arg(long, value_enum)]
    pub model: Option<ModelArg>,

    /// Expected regime length of the block bootstrap, in months
    #[arg(long)]
    pub regime_months: Option<u32>,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(ClapArgs, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Population size
    #[arg(long)]
    pub size: Option<usize>,

    /// Number of generations
    #[arg(long)]
    pub iterations: Option<usize>,

    #[arg(long, value_enum)]
    pub model: Option<ModelArg>,

    /// Expected regime length of the block bootstrap, in months
    #[arg(long)]
    pub regime_months: Option<u32>,

    /// Reference position seeding the Markov model (repeatable; default equal weight)
    #[arg(long = "reference", value_parser = parse_position)]
    pub reference: Vec<Position>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Print each generation's best allocation as a CSV row
    #[arg(long)]
    pub csv: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelArg {
    Historical,
    Block,
    Markov,
}

impl ModelArg {
    #[must_use]
    pub fn to_model(self, regime_months: Option<u32>) -> ScenarioModel {
        match self {
            ModelArg::Historical => ScenarioModel::Historical,
            ModelArg::Block => match regime_months {
                Some(expected_regime_months) => ScenarioModel::BlockBootstrap {
                    expected_regime_months,
                },
                None => ScenarioModel::block(),
            },
            ModelArg::Markov => ScenarioModel::Markov,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PositionParseError {
    #[error("got {0:?}, want \"<name>:<weight>\"")]
    Format(String),

    #[error("invalid weight {weight:?}: {source}")]
    Weight {
        weight: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Parse a `name:weight` position argument.
pub fn parse_position(arg: &str) -> Result<Position, PositionParseError> {
    let fields: Vec<&str> = arg.split(':').collect();
    let [name, weight] = fields.as_slice() else {
        return Err(PositionParseError::Format(arg.to_string()));
    };
    if name.is_empty() {
        return Err(PositionParseError::Format(arg.to_string()));
    }
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|source| PositionParseError::Weight {
            weight: weight.to_string(),
            source,
        })?;
    Ok(Position::new(*name, weight))
}

/// Portfolio from parsed positions; `None` when no positions were given.
pub fn portfolio_from(positions: &[Position]) -> Result<Option<Portfolio>, PortfolioError> {
    if positions.is_empty() {
        return Ok(None);
    }
    Portfolio::new(positions.to_vec()).map(Some)
}

/// Select `model` if given, then apply `regime_months` to a block bootstrap.
fn apply_model(target: &mut ScenarioModel, model: Option<ModelArg>, regime_months: Option<u32>) {
    if let Some(model) = model {
        *target = model.to_model(regime_months);
    }
    if let (
        ScenarioModel::BlockBootstrap {
            expected_regime_months,
        },
        Some(months),
    ) = (target, regime_months)
    {
        *expected_regime_months = months;
    }
}

impl ForecastArgs {
    /// Apply command line overrides on top of a file configuration.
    pub fn apply(&self, config: &mut ForecastConfig) {
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        apply_model(&mut config.model, self.model, self.regime_months);
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }

    /// Models to forecast with, in print order.
    ///
    /// An explicit `--model` or a config file selects a single model;
    /// otherwise the configured block bootstrap is followed by the Markov chain.
    #[must_use]
    pub fn models(&self, config: &ForecastConfig) -> Vec<ScenarioModel> {
        if self.model.is_some() || self.input.config.is_some() {
            vec![config.model]
        } else {
            vec![config.model, ScenarioModel::Markov]
        }
    }
}

impl OptimizeArgs {
    /// Apply command line overrides on top of a file configuration.
    pub fn apply(&self, config: &mut OptimizerConfig) -> Result<(), PortfolioError> {
        if let Some(size) = self.size {
            config.population_size = size;
        }
        if let Some(generations) = self.iterations {
            config.generations = generations;
        }
        apply_model(&mut config.model, self.model, self.regime_months);
        if let Some(reference) = portfolio_from(&self.reference)? {
            config.reference = Some(reference);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(())
    }
}
