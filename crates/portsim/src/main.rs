use std::io::{self, Write};

use clap::Parser;
use color_eyre::eyre::{WrapErr, bail};
use portsim::cli::{Args, BacktestArgs, Command, ForecastArgs, OptimizeArgs, portfolio_from};
use portsim::config::RunConfig;
use portsim::{init_logging, loader, report};
use portsim_core::analysis::{ForecastConfig, backtest, forecast};
use portsim_core::optimization::{GenerationReport, PopulationOptimizer, ProgressCallback};
use portsim_core::SeriesStore;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    match args.command {
        Command::Backtest(args) => run_backtest(&args),
        Command::Forecast(args) => run_forecast(&args),
        Command::Optimize(args) => run_optimize(&args),
    }
}

fn load_history(path: &std::path::Path) -> color_eyre::Result<SeriesStore> {
    let store = loader::load_path(path)?;
    tracing::info!(
        path = %path.display(),
        series = store.len(),
        months = store.common_len(),
        "history loaded"
    );
    Ok(store)
}

fn run_backtest(args: &BacktestArgs) -> color_eyre::Result<()> {
    let store = load_history(&args.input.input)?;
    let Some(portfolio) = portfolio_from(&args.positions)? else {
        report::write_available_series(&mut io::stdout(), store.names())?;
        bail!("no positions given");
    };

    let result = backtest(&portfolio, &store).wrap_err("backtest failed")?;
    report::write_backtest(&mut io::stdout(), &result)?;
    Ok(())
}

fn run_forecast(args: &ForecastArgs) -> color_eyre::Result<()> {
    let mut config = RunConfig::load(args.input.config.as_deref())?.forecast;
    args.apply(&mut config);

    let store = load_history(&args.input.input)?;
    let Some(portfolio) = portfolio_from(&args.positions)? else {
        report::write_available_series(&mut io::stdout(), store.names())?;
        bail!("no positions given");
    };

    let mut out = io::stdout().lock();
    writeln!(out, "{portfolio}")?;
    for model in args.models(&config) {
        let config = ForecastConfig {
            model,
            ..config.clone()
        };
        tracing::info!(
            iterations = config.iterations,
            model = model.label(),
            "running forecast"
        );
        let summary = forecast(&portfolio, &store, &config).wrap_err("forecast failed")?;
        report::write_forecast(&mut out, report::forecast_title(&model), &summary)?;
    }
    Ok(())
}

fn run_optimize(args: &OptimizeArgs) -> color_eyre::Result<()> {
    let mut config = RunConfig::load(args.input.config.as_deref())?.optimizer;
    args.apply(&mut config)?;

    let store = load_history(&args.input.input)?;
    let names: Vec<&str> = store.names().collect();
    println!("{}", names.join(","));

    let csv = args.csv;
    let progress: ProgressCallback = Box::new(move |generation: &GenerationReport| {
        if let Err(e) = report::write_generation(&mut io::stdout(), generation, csv) {
            tracing::warn!(error = %e, "failed to write progress");
        }
    });

    let result = PopulationOptimizer::new(config)
        .run(&store, Some(progress))
        .wrap_err("optimization failed")?;
    report::write_result(&mut io::stdout(), &result)?;

    tracing::info!(
        sharpe = result.best.rank_key(),
        best = %result.best.portfolio,
        "optimization finished"
    );
    Ok(())
}
