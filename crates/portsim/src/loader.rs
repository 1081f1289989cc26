//! Historical return CSV loading
//!
//! The expected layout is a header `Date,<asset>,<asset>...` followed by one
//! row per month. Dates are `YYYY-MM-DD`; values are monthly returns in
//! percent, with either `.` or `,` as the decimal separator. Values are
//! converted to fractional returns here (`"5,648"` becomes `0.05648`).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use jiff::civil::Date;
use portsim_core::{Datum, SeriesStore, TimeSeries};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("header needs a date column and at least one series")]
    NoSeries,

    #[error("series {0:?} appears more than once in the header")]
    DuplicateName(String),

    #[error("line {line}: invalid date {value:?}: {source}")]
    Date {
        line: u64,
        value: String,
        #[source]
        source: jiff::Error,
    },

    #[error("line {line}, series {series:?}: invalid value {value:?}")]
    Value {
        line: u64,
        series: String,
        value: String,
    },
}

/// Load a series store from CSV text.
pub fn load_reader<R: Read>(reader: R) -> Result<SeriesStore, LoadError> {
    let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let header = csv.headers()?.clone();
    if header.len() < 2 {
        return Err(LoadError::NoSeries);
    }

    let mut series: Vec<TimeSeries> = Vec::with_capacity(header.len() - 1);
    for name in header.iter().skip(1) {
        let name = name.trim();
        if series.iter().any(|s| s.name == name) {
            return Err(LoadError::DuplicateName(name.to_string()));
        }
        series.push(TimeSeries::new(name, Vec::new()));
    }

    for record in csv.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);

        let raw_date = record.get(0).unwrap_or_default().trim();
        let date: Date = raw_date.parse().map_err(|source| LoadError::Date {
            line,
            value: raw_date.to_string(),
            source,
        })?;

        for (ts, raw) in series.iter_mut().zip(record.iter().skip(1)) {
            let value = parse_percent(raw).ok_or_else(|| LoadError::Value {
                line,
                series: ts.name.clone(),
                value: raw.to_string(),
            })?;
            ts.push(Datum::new(date, value));
        }
    }

    tracing::debug!(
        series = series.len(),
        rows = series.first().map_or(0, TimeSeries::len),
        "loaded history"
    );
    Ok(series.into_iter().collect())
}

/// Load a series store from a CSV file.
pub fn load_path(path: &Path) -> Result<SeriesStore, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file)
}

/// Parse a percentage with `.` or `,` decimal separator into a fraction.
fn parse_percent(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value / 100.0)
}
