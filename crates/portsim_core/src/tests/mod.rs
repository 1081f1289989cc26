//! Integration tests for the portsim evaluation engine
//!
//! Tests are organized by topic:
//! - `end_to_end` - Evaluation of fixed portfolios against small fixtures
//! - `scenarios` - Step counts and model invariants of every provider
//! - `optimizer` - Recombination properties and full optimizer runs
//! - `forecast` - Monte Carlo forecasts and backtests

mod end_to_end;
mod forecast;

use jiff::civil::{Date, date};

use crate::model::{SeriesStore, TimeSeries};

pub(crate) fn fixture_start() -> Date {
    date(2005, 1, 31)
}

/// Three assets over four years of alternating, trending and flat months.
pub(crate) fn sample_store() -> SeriesStore {
    let months = 48;
    let stocks: Vec<f64> = (0..months)
        .map(|i| match i % 4 {
            0 => 0.031,
            1 => -0.022,
            2 => 0.014,
            _ => -0.008,
        })
        .collect();
    let bonds: Vec<f64> = (0..months)
        .map(|i| if i % 3 == 0 { 0.004 } else { 0.002 })
        .collect();
    let gold: Vec<f64> = (0..months)
        .map(|i| if i % 2 == 0 { -0.015 } else { 0.019 })
        .collect();

    [
        TimeSeries::monthly("STOCKS", fixture_start(), &stocks),
        TimeSeries::monthly("BONDS", fixture_start(), &bonds),
        TimeSeries::monthly("GOLD", fixture_start(), &gold),
    ]
    .into_iter()
    .collect()
}
