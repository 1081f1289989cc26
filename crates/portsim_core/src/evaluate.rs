//! Portfolio evaluation against a scenario

use crate::error::ScenarioError;
use crate::model::{Datum, Portfolio, TimeSeries};
use crate::scenario::ScenarioProvider;

/// Drive `provider` to exhaustion, growing each position by the factor it
/// reports, and return the portfolio's monthly return series.
///
/// The caller's portfolio is never modified. The first provider error aborts
/// the evaluation; no partial series is returned.
pub fn evaluate<P: ScenarioProvider + ?Sized>(
    portfolio: &Portfolio,
    provider: &mut P,
) -> Result<TimeSeries, ScenarioError> {
    let mut values: Vec<(&str, f64)> = portfolio
        .positions()
        .iter()
        .map(|p| (p.asset.as_str(), p.weight))
        .collect();
    let mut prev_total = portfolio.total_weight();
    let mut result = TimeSeries::new(portfolio.to_string(), Vec::new());

    while let Some(date) = provider.advance() {
        let mut total = 0.0;
        for (asset, value) in &mut values {
            *value *= provider.relative_return(*asset)?;
            total += *value;
        }
        result.push(Datum::new(date, total / prev_total - 1.0));
        prev_total = total;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, SeriesStore};
    use crate::scenario::HistoricalReplay;
    use jiff::civil::date;

    fn store() -> SeriesStore {
        let start = date(2010, 1, 31);
        [
            TimeSeries::monthly("A", start, &[0.0, 0.10, -0.05, 0.02]),
            TimeSeries::monthly("B", start, &[0.0, -0.10, 0.05, 0.00]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_blended_returns() {
        let store = store();
        let portfolio =
            Portfolio::new(vec![Position::new("A", 50.0), Position::new("B", 50.0)]).unwrap();
        let result = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();

        assert_eq!(result.len(), 3);
        // 50 * 1.1 + 50 * 0.9 = 100
        assert!(result.data[0].value.abs() < 1e-12);
        // 55 * 0.95 + 45 * 1.05 = 99.5
        assert!((result.data[1].value - (-0.005)).abs() < 1e-12);
        assert_eq!(result.data[0].date, date(2010, 2, 28));
    }

    #[test]
    fn test_does_not_mutate_portfolio() {
        let store = store();
        let portfolio = Portfolio::new(vec![Position::new("A", 1.0)]).unwrap();
        let before = portfolio.clone();
        evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();
        assert_eq!(portfolio, before);
    }

    #[test]
    fn test_unknown_asset_aborts() {
        let store = store();
        let portfolio =
            Portfolio::new(vec![Position::new("A", 1.0), Position::new("Z", 1.0)]).unwrap();
        let err = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap_err();
        assert_eq!(err, ScenarioError::DataNotFound("Z".to_string()));
    }

    #[test]
    fn test_exhausted_provider_yields_empty_series() {
        let store = SeriesStore::new();
        let portfolio = Portfolio::new(vec![Position::new("A", 1.0)]).unwrap();
        let result = evaluate(&portfolio, &mut HistoricalReplay::new(&store)).unwrap();
        assert!(result.is_empty());
        assert!(result.last().is_nan());
    }
}
