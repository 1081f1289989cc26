//! Scenario providers: historical replay and synthetic futures
//!
//! A [`ScenarioProvider`] yields a sequence of monthly steps. Each call to
//! [`ScenarioProvider::advance`] moves to the next step and returns its date;
//! [`ScenarioProvider::relative_return`] then reports the growth factor
//! (`1 + r`) of an asset realized on the way into that step.
//!
//! Providers are single-use: construct one, drive it to exhaustion, drop it.
//!
//! - [`HistoricalReplay`] - deterministic single pass over the loaded data
//! - [`BlockBootstrap`] - regime-persistence resampling of historical months
//! - [`MarkovBootstrap`] - single-factor Markov chain over discretized returns

mod block;
mod historical;
mod markov;

pub use block::{BlockBootstrap, DEFAULT_EXPECTED_REGIME_MONTHS};
pub use historical::HistoricalReplay;
pub use markov::{Edge, MarkovBootstrap, TransitionGraph, discretize};

use std::sync::Arc;

use jiff::ToSpan;
use jiff::civil::Date;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::error::ScenarioError;
use crate::model::{Datum, SeriesStore, TimeSeries};

/// Default length of a synthetic future
pub const DEFAULT_HORIZON_YEARS: i16 = 30;

/// Longest synthetic future accepted by the configs
pub const MAX_HORIZON_YEARS: i16 = 200;

pub trait ScenarioProvider {
    /// Move to the next step. Returns `None` once the scenario is exhausted.
    fn advance(&mut self) -> Option<Date>;

    /// Growth factor of `asset` for the current step.
    fn relative_return(&self, asset: &str) -> Result<f64, ScenarioError>;
}

impl<P: ScenarioProvider + ?Sized> ScenarioProvider for &mut P {
    fn advance(&mut self) -> Option<Date> {
        (**self).advance()
    }

    fn relative_return(&self, asset: &str) -> Result<f64, ScenarioError> {
        (**self).relative_return(asset)
    }
}

/// Calendar bounds of a synthetic scenario.
///
/// Steps are dated on the first of each month, starting one month after
/// `start`; the scenario ends once the next date would fall after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub start: Date,
    pub end: Date,
}

impl Horizon {
    /// Anchor at `anchor`: start on the first of its month, end `years` later.
    ///
    /// An end past the last representable date is clamped to it; use
    /// [`Horizon::try_anchored`] to reject such horizons instead.
    #[must_use]
    pub fn anchored(anchor: Date, years: i16) -> Self {
        Self {
            start: anchor.first_of_month(),
            end: anchor.checked_add(years.years()).unwrap_or(Date::MAX),
        }
    }

    /// Like [`Horizon::anchored`], but `None` unless `years` lies in
    /// `1..=MAX_HORIZON_YEARS` and the end date is representable.
    #[must_use]
    pub fn try_anchored(anchor: Date, years: i16) -> Option<Self> {
        if !(1..=MAX_HORIZON_YEARS).contains(&years) {
            return None;
        }
        let end = anchor.checked_add(years.years()).ok()?;
        Some(Self {
            start: anchor.first_of_month(),
            end,
        })
    }

    /// Anchor at today's local date.
    #[must_use]
    pub fn from_today(years: i16) -> Self {
        Self::anchored(jiff::Zoned::now().date(), years)
    }

    #[must_use]
    pub fn clock(&self) -> MonthlyClock {
        MonthlyClock {
            date: self.start,
            end: self.end,
            done: false,
        }
    }
}

/// Monthly calendar cursor driven by the synthetic providers
#[derive(Debug, Clone)]
pub struct MonthlyClock {
    date: Date,
    end: Date,
    done: bool,
}

impl MonthlyClock {
    /// Advance one month. Returns `None` (and keeps returning it) once the
    /// date passes the end of the horizon or the calendar runs out.
    pub fn tick(&mut self) -> Option<Date> {
        if self.done {
            return None;
        }
        match self.date.checked_add(1.month()) {
            Ok(next) if next <= self.end => {
                self.date = next;
                Some(next)
            }
            _ => {
                self.done = true;
                None
            }
        }
    }

    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }
}

/// The three provider variants behind one type, for runtime selection.
pub enum Scenario<'a> {
    Historical(HistoricalReplay<'a>),
    Block(BlockBootstrap<'a, SmallRng>),
    Markov(MarkovBootstrap<SmallRng>),
}

impl ScenarioProvider for Scenario<'_> {
    fn advance(&mut self) -> Option<Date> {
        match self {
            Scenario::Historical(p) => p.advance(),
            Scenario::Block(p) => p.advance(),
            Scenario::Markov(p) => p.advance(),
        }
    }

    fn relative_return(&self, asset: &str) -> Result<f64, ScenarioError> {
        match self {
            Scenario::Historical(p) => p.relative_return(asset),
            Scenario::Block(p) => p.relative_return(asset),
            Scenario::Markov(p) => p.relative_return(asset),
        }
    }
}

/// Which provider to build for a synthetic run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ScenarioModel {
    /// Replay the loaded history once
    Historical,
    /// Resample historical months with regime persistence
    BlockBootstrap {
        #[serde(default = "default_expected_regime_months")]
        expected_regime_months: u32,
    },
    /// Markov chain over the discretized reference return series
    #[default]
    Markov,
}

fn default_expected_regime_months() -> u32 {
    DEFAULT_EXPECTED_REGIME_MONTHS
}

impl ScenarioModel {
    #[must_use]
    pub fn block() -> Self {
        ScenarioModel::BlockBootstrap {
            expected_regime_months: DEFAULT_EXPECTED_REGIME_MONTHS,
        }
    }

    /// Build a provider. `graph` is only consulted for [`ScenarioModel::Markov`],
    /// which fails with [`ScenarioError::EmptyModel`] without one.
    pub fn build<'a>(
        &self,
        store: &'a SeriesStore,
        graph: Option<&Arc<TransitionGraph>>,
        horizon: Horizon,
        rng: SmallRng,
    ) -> Result<Scenario<'a>, ScenarioError> {
        Ok(match self {
            ScenarioModel::Historical => Scenario::Historical(HistoricalReplay::new(store)),
            ScenarioModel::BlockBootstrap {
                expected_regime_months,
            } => Scenario::Block(BlockBootstrap::new(
                store,
                horizon,
                *expected_regime_months,
                rng,
            )?),
            ScenarioModel::Markov => {
                let graph = graph.ok_or(ScenarioError::EmptyModel)?;
                Scenario::Markov(MarkovBootstrap::from_graph(Arc::clone(graph), horizon, rng)?)
            }
        })
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioModel::Historical => "Historical",
            ScenarioModel::BlockBootstrap { .. } => "Block Bootstrap",
            ScenarioModel::Markov => "Markov Chain",
        }
    }
}

/// Drive `provider` to exhaustion and store each asset's per-step return.
///
/// Every recorded series begins with a seed datum one month before the first
/// step (value 0.0), so a [`HistoricalReplay`] over the result replays exactly
/// the recorded steps. Any provider error aborts the recording.
pub fn record<'n, P: ScenarioProvider + ?Sized>(
    names: impl IntoIterator<Item = &'n str>,
    provider: &mut P,
) -> Result<SeriesStore, ScenarioError> {
    let mut series: Vec<TimeSeries> = names
        .into_iter()
        .map(|name| TimeSeries::new(name, Vec::new()))
        .collect();

    while let Some(date) = provider.advance() {
        for ts in &mut series {
            let factor = provider.relative_return(&ts.name)?;
            if ts.is_empty() {
                ts.push(Datum::new(date.saturating_sub(1.month()), 0.0));
            }
            ts.push(Datum::new(date, factor - 1.0));
        }
    }

    Ok(series.into_iter().collect())
}
