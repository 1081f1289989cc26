//! End-to-end evaluation tests
//!
//! These tests verify that:
//! - A fully weighted single-asset portfolio reproduces that asset's returns
//! - Evaluation is deterministic given identical provider output
//! - Provider errors surface unchanged

use jiff::civil::date;

use crate::error::ScenarioError;
use crate::evaluate::evaluate;
use crate::model::{Portfolio, Position, SeriesStore, TimeSeries};
use crate::scenario::{HistoricalReplay, record};

use super::sample_store;

fn two_by_two() -> SeriesStore {
    let start = date(2020, 1, 31);
    [
        TimeSeries::monthly("X", start, &[0.012, 0.034]),
        TimeSeries::monthly("Y", start, &[-0.020, 0.051]),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_single_asset_portfolio_reproduces_its_series() {
    let store = two_by_two();
    let portfolio =
        Portfolio::new(vec![Position::new("Y", 100.0), Position::new("X", 0.0)]).unwrap();

    let result = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();
    let source = store.get("Y").unwrap();

    // The first row only anchors the series
    assert_eq!(result.len(), 1);
    assert_eq!(result.data[0].date, source.data[1].date);
    assert!((result.data[0].value - source.data[1].value).abs() < 1e-12);
}

#[test]
fn test_single_asset_over_full_history() {
    let store = sample_store();
    let portfolio = Portfolio::new(vec![Position::new("GOLD", 1.0)]).unwrap();

    let result = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();
    let gold = store.get("GOLD").unwrap();

    assert_eq!(result.len(), gold.len() - 1);
    for (got, want) in result.data.iter().zip(&gold.data[1..]) {
        assert_eq!(got.date, want.date);
        assert!((got.value - want.value).abs() < 1e-12);
    }
}

#[test]
fn test_evaluation_is_deterministic() {
    let store = sample_store();
    let portfolio = Portfolio::new(vec![
        Position::new("STOCKS", 60.0),
        Position::new("BONDS", 30.0),
        Position::new("GOLD", 10.0),
    ])
    .unwrap();

    let first = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();
    let second = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_recorded_scenario_replays_identically() {
    let store = sample_store();
    let portfolio = Portfolio::new(vec![
        Position::new("STOCKS", 50.0),
        Position::new("GOLD", 50.0),
    ])
    .unwrap();

    let recorded = record(store.names(), &mut HistoricalReplay::new(&store)).unwrap();
    assert_eq!(recorded.common_len(), store.common_len());

    let direct = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();
    let replayed = evaluate(&portfolio, &mut HistoricalReplay::new(&recorded)).unwrap();
    assert_eq!(direct.len(), replayed.len());
    for (a, b) in direct.data.iter().zip(&replayed.data) {
        assert_eq!(a.date, b.date);
        assert!((a.value - b.value).abs() < 1e-12);
    }
}

#[test]
fn test_unknown_asset_propagates() {
    let store = sample_store();
    let portfolio = Portfolio::new(vec![Position::new("OIL", 1.0)]).unwrap();
    assert_eq!(
        evaluate(&portfolio, &mut HistoricalReplay::new(&store)),
        Err(ScenarioError::DataNotFound("OIL".to_string()))
    );
}

#[test]
fn test_stats_of_blended_history_are_finite() {
    let store = sample_store();
    let portfolio = Portfolio::equal_weight(store.names(), 100_000.0).unwrap();
    let stats = evaluate(&portfolio, &mut HistoricalReplay::new(&store))
        .unwrap()
        .stats();
    assert!(stats.returns.is_finite());
    assert!(stats.volatility > 0.0);
    assert!(stats.sharpe_ratio.is_finite());
}
