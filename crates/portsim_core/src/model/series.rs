//! Monthly return series and the per-asset store
//!
//! Every value in a series is a fractional monthly relative return
//! (0.05 = +5%). Level data is converted at the loading boundary.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// One observation of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub date: Date,
    pub value: f64,
}

impl Datum {
    #[must_use]
    pub fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

/// Named, date-ordered sequence of monthly returns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub name: String,
    pub data: Vec<Datum>,
}

impl TimeSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<Datum>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Build a series from bare values, dated monthly from `start`.
    #[must_use]
    pub fn monthly(name: impl Into<String>, start: Date, values: &[f64]) -> Self {
        let data = values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let date = start.saturating_add(jiff::Span::new().months(i as i64));
                Datum::new(date, value)
            })
            .collect();
        Self::new(name, data)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(|d| d.value)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Datum> {
        self.data.get(index)
    }

    pub fn push(&mut self, datum: Datum) {
        self.data.push(datum);
    }
}

impl std::fmt::Display for TimeSeries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Mapping from asset name to its series.
///
/// Backed by a `BTreeMap` so iteration is in lexicographic name order, which
/// makes every "first/shortest series" decision deterministic. Read-only once
/// built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesStore {
    series: BTreeMap<String, TimeSeries>,
}

impl SeriesStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a series under its own name, replacing any previous entry.
    pub fn insert(&mut self, series: TimeSeries) {
        self.series.insert(series.name.clone(), series);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TimeSeries> {
        self.series.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    /// Asset names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeSeries> {
        self.series.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// The series defining the common horizon: the shortest one, ties broken
    /// by the lexicographically smallest name.
    #[must_use]
    pub fn shortest(&self) -> Option<&TimeSeries> {
        let mut shortest: Option<&TimeSeries> = None;
        for series in self.series.values() {
            match shortest {
                Some(s) if s.len() <= series.len() => {}
                _ => shortest = Some(series),
            }
        }
        shortest
    }

    /// Length of the common horizon (0 for an empty store).
    #[must_use]
    pub fn common_len(&self) -> usize {
        self.shortest().map_or(0, TimeSeries::len)
    }
}

impl FromIterator<TimeSeries> for SeriesStore {
    fn from_iter<I: IntoIterator<Item = TimeSeries>>(iter: I) -> Self {
        let mut store = SeriesStore::new();
        for series in iter {
            store.insert(series);
        }
        store
    }
}
