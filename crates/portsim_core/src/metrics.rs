//! Risk/return statistics over monthly return series
//!
//! All statistics are computed over the fractional monthly returns stored in a
//! [`TimeSeries`]. Degenerate inputs are not clamped: an empty series yields
//! `NaN` for [`TimeSeries::last`], [`TimeSeries::average`] and
//! [`TimeSeries::volatility`], and a zero-volatility series yields an infinite
//! or `NaN` Sharpe ratio. Callers that rank by these values must handle that.
//!
//! The Sharpe ratio here is annualized return over annualized volatility with
//! no risk-free rate subtracted. It is a ranking statistic, not the textbook
//! excess-return ratio.

use serde::{Deserialize, Serialize};

use crate::model::TimeSeries;

const MONTHS_PER_YEAR: f64 = 12.0;

impl TimeSeries {
    /// Arithmetic mean of the monthly returns.
    #[must_use]
    pub fn average(&self) -> f64 {
        self.values().sum::<f64>() / self.len() as f64
    }

    /// Population variance (divides by N).
    #[must_use]
    pub fn variance(&self) -> f64 {
        let avg = self.average();
        self.values().map(|v| (v - avg).powi(2)).sum::<f64>() / self.len() as f64
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Annualized volatility in percent: `100 * stddev * sqrt(12)`.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        100.0 * self.std_dev() * MONTHS_PER_YEAR.sqrt()
    }

    /// Annualized compound growth in percent: `100 * (prod(1 + r)^(12/N) - 1)`.
    #[must_use]
    pub fn returns(&self) -> f64 {
        let growth: f64 = self.values().map(|r| 1.0 + r).product();
        let years = self.len() as f64 / MONTHS_PER_YEAR;
        100.0 * (growth.powf(1.0 / years) - 1.0)
    }

    /// `returns() / volatility()`, without risk-free-rate adjustment.
    #[must_use]
    pub fn sharpe_ratio(&self) -> f64 {
        self.returns() / self.volatility()
    }

    /// Smallest monthly return (`NaN` when empty).
    #[must_use]
    pub fn min(&self) -> f64 {
        self.values().fold(f64::NAN, f64::min)
    }

    /// Largest monthly return (`NaN` when empty).
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values().fold(f64::NAN, f64::max)
    }

    #[must_use]
    pub fn last(&self) -> f64 {
        self.data.last().map_or(f64::NAN, |d| d.value)
    }

    #[must_use]
    pub fn stats(&self) -> SeriesStats {
        SeriesStats::from_series(self)
    }
}

/// The three ranking statistics of a result series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    /// Annualized return, percent
    pub returns: f64,
    /// Annualized volatility, percent
    pub volatility: f64,
    pub sharpe_ratio: f64,
}

impl SeriesStats {
    #[must_use]
    pub fn from_series(series: &TimeSeries) -> Self {
        let returns = series.returns();
        let volatility = series.volatility();
        Self {
            returns,
            volatility,
            sharpe_ratio: returns / volatility,
        }
    }

    /// Sort key for rankings. `NaN` ranks below everything else.
    #[must_use]
    pub fn rank_key(&self) -> f64 {
        if self.sharpe_ratio.is_nan() {
            f64::NEG_INFINITY
        } else {
            self.sharpe_ratio
        }
    }
}

impl std::fmt::Display for SeriesStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "returns: {:.1}%; volatility: {:.1}%; sharpe ratio: {:.2}",
            self.returns, self.volatility, self.sharpe_ratio
        )
    }
}
