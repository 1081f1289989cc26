mod portfolio;
mod series;

pub use portfolio::{Portfolio, Position};
pub use series::{Datum, SeriesStore, TimeSeries};
