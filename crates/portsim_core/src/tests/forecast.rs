//! Forecast and backtest tests

use jiff::civil::date;

use crate::analysis::{ForecastConfig, backtest, forecast};
use crate::error::AnalysisError;
use crate::model::{Portfolio, Position};
use crate::scenario::ScenarioModel;

use super::sample_store;

fn portfolio() -> Portfolio {
    Portfolio::new(vec![
        Position::new("STOCKS", 70.0),
        Position::new("BONDS", 30.0),
    ])
    .unwrap()
}

fn config(model: ScenarioModel) -> ForecastConfig {
    ForecastConfig {
        iterations: 250,
        model,
        anchor: Some(date(2026, 10, 14)),
        seed: Some(42),
        ..Default::default()
    }
}

#[test]
fn test_backtest_matches_history_length() {
    let store = sample_store();
    let result = backtest(&portfolio(), &store).unwrap();
    assert_eq!(result.series.len(), store.common_len() - 1);
    assert_eq!(result.stats, result.series.stats());
}

#[test]
fn test_block_forecast_rows_ordered() {
    let store = sample_store();
    let summary = forecast(&portfolio(), &store, &config(ScenarioModel::block())).unwrap();

    assert_eq!(summary.iterations, 250);
    let percentiles: Vec<u8> = summary.rows.iter().map(|r| r.percentile).collect();
    assert_eq!(percentiles, vec![50, 80, 90, 95, 99]);

    // Higher percentiles pick outcomes further down the ranking
    for pair in summary.rows.windows(2) {
        assert!(pair[0].stats.rank_key() >= pair[1].stats.rank_key());
    }
}

#[test]
fn test_forecast_is_reproducible_with_seed() {
    let store = sample_store();
    let config = config(ScenarioModel::block());
    let a = forecast(&portfolio(), &store, &config).unwrap();
    let b = forecast(&portfolio(), &store, &config).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_markov_forecast() {
    let store = sample_store();
    let summary = forecast(&portfolio(), &store, &config(ScenarioModel::Markov)).unwrap();
    assert_eq!(summary.rows.len(), 5);
    assert!(summary.rows.iter().all(|r| r.stats.volatility >= 0.0));
}

#[test]
fn test_forecast_rejects_bad_config() {
    let store = sample_store();
    let zero = ForecastConfig {
        iterations: 0,
        ..config(ScenarioModel::block())
    };
    assert!(matches!(
        forecast(&portfolio(), &store, &zero),
        Err(AnalysisError::Config(_))
    ));

    let historical = config(ScenarioModel::Historical);
    assert!(matches!(
        forecast(&portfolio(), &store, &historical),
        Err(AnalysisError::Config(_))
    ));
}

#[test]
fn test_forecast_unknown_asset_fails() {
    let store = sample_store();
    let portfolio = Portfolio::new(vec![Position::new("OIL", 1.0)]).unwrap();
    assert!(matches!(
        forecast(&portfolio, &store, &config(ScenarioModel::block())),
        Err(AnalysisError::Scenario(_))
    ));
}
