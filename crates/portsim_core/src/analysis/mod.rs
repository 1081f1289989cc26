//! Backtest and forecast of a single portfolio
//!
//! [`backtest`] replays the loaded history once. [`forecast`] runs many
//! independent synthetic futures and summarizes the spread of outcomes as
//! Sharpe-ratio percentiles:
//!
//! ```ignore
//! use portsim_core::analysis::{ForecastConfig, forecast};
//!
//! let config = ForecastConfig { iterations: 1_000, seed: Some(7), ..Default::default() };
//! let summary = forecast(&portfolio, &store, &config)?;
//! for row in &summary.rows {
//!     println!("{row}");
//! }
//! ```

mod config;
mod forecast;

pub use config::ForecastConfig;
pub use forecast::{Backtest, ForecastSummary, PercentileRow, backtest, forecast};
