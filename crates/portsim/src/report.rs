//! Console output of backtests, forecasts and optimizer progress

use std::io::{self, Write};

use portsim_core::ScenarioModel;
use portsim_core::analysis::{Backtest, ForecastSummary};
use portsim_core::optimization::{GenerationReport, OptimizationResult};

/// Printed when a command needs positions but none were given.
pub fn write_available_series<'a, W: Write>(
    w: &mut W,
    names: impl IntoIterator<Item = &'a str>,
) -> io::Result<()> {
    writeln!(w, "ERROR: specify one or more --pos arguments.")?;
    writeln!(w)?;
    writeln!(w, "Available time series:")?;
    writeln!(w)?;
    for name in names {
        writeln!(w, "  * {name}")?;
    }
    Ok(())
}

pub fn write_backtest<W: Write>(w: &mut W, backtest: &Backtest) -> io::Result<()> {
    writeln!(w, "=== Backtest ===")?;
    writeln!(w, "data {:?} ({})", backtest.series.name, backtest.stats)
}

/// Section heading for a forecast run with `model`.
#[must_use]
pub fn forecast_title(model: &ScenarioModel) -> &'static str {
    match model {
        ScenarioModel::Markov => "Markov Chain",
        _ => "Monte Carlo",
    }
}

pub fn write_forecast<W: Write>(
    w: &mut W,
    title: &str,
    summary: &ForecastSummary,
) -> io::Result<()> {
    writeln!(w, "=== {title} ===")?;
    for row in &summary.rows {
        writeln!(w, "{row}")?;
    }
    Ok(())
}

/// One line per generation: the best individual, or its allocation as CSV.
pub fn write_generation<W: Write>(
    w: &mut W,
    report: &GenerationReport,
    csv: bool,
) -> io::Result<()> {
    if csv {
        writeln!(w, "{}", report.best.portfolio.csv_row())
    } else if report.failed > 0 {
        writeln!(w, "{} [{} failed]", report.best, report.failed)
    } else {
        writeln!(w, "{}", report.best)
    }
}

pub fn write_result<W: Write>(w: &mut W, result: &OptimizationResult) -> io::Result<()> {
    writeln!(w, "=== Best after {} generations ===", result.generations)?;
    writeln!(w, "{}", result.best)
}
