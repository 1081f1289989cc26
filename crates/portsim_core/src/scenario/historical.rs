use jiff::civil::Date;

use crate::error::ScenarioError;
use crate::model::{SeriesStore, TimeSeries};

use super::ScenarioProvider;

/// Deterministic single pass over the loaded history.
///
/// The shortest series defines the horizon. The first entry is never read as
/// a return, so a horizon of N entries yields N - 1 steps.
#[derive(Debug, Clone)]
pub struct HistoricalReplay<'a> {
    store: &'a SeriesStore,
    shortest: Option<&'a TimeSeries>,
    cursor: usize,
}

impl<'a> HistoricalReplay<'a> {
    #[must_use]
    pub fn new(store: &'a SeriesStore) -> Self {
        Self {
            store,
            shortest: store.shortest(),
            cursor: 0,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl ScenarioProvider for HistoricalReplay<'_> {
    fn advance(&mut self) -> Option<Date> {
        let shortest = self.shortest?;
        if self.cursor + 1 >= shortest.len() {
            return None;
        }
        self.cursor += 1;
        shortest.get(self.cursor).map(|d| d.date)
    }

    fn relative_return(&self, asset: &str) -> Result<f64, ScenarioError> {
        lookup(self.store, asset, self.cursor)
    }
}

/// `1 + value` of `asset` at `index`, rejecting the reserved first entry.
pub(super) fn lookup(store: &SeriesStore, asset: &str, index: usize) -> Result<f64, ScenarioError> {
    let series = store
        .get(asset)
        .ok_or_else(|| ScenarioError::DataNotFound(asset.to_string()))?;
    match series.get(index) {
        Some(datum) if index >= 1 => Ok(1.0 + datum.value),
        _ => Err(ScenarioError::IndexOutOfRange {
            asset: asset.to_string(),
            index,
            len: series.len(),
        }),
    }
}
