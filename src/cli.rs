//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::adapters::csv_adapter::{CsvPriceAdapter, DEFAULT_PRICE_COLUMN};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::report_adapter_for;
use crate::domain::config_validation::{
    investment_parameters, report_date_format, section_dates, strategy_names,
    strategy_parameters, validate_run_config,
};
use crate::domain::encoding::format_holding_duration;
use crate::domain::error::DripfeedError;
use crate::domain::runner::{RunRequest, StrategyReport, list_strategies, run_comparison};
use crate::domain::strategy::random::SEED_PARAMETER;
use crate::domain::strategy::registry;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;

#[derive(Parser, Debug)]
#[command(name = "dripfeed", about = "Dollar-cost-averaging strategy evaluator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate one or more strategies
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Strategy to run; repeat to compare several
        #[arg(short, long = "strategy")]
        strategies: Vec<String>,
        #[arg(long)]
        ticker: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Seed for RandomInvestment
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List registered strategies and their parameters
    ListStrategies {
        #[arg(long)]
        json: bool,
    },
    /// Validate a run configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Show the data range for a ticker
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        ticker: Option<String>,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .ok();
}

pub fn run(cli: Cli) -> ExitCode {
    let outcome = match cli.command {
        Command::Run {
            config,
            strategies,
            ticker,
            output,
            seed,
        } => run_strategies(&config, &strategies, ticker.as_deref(), output.as_ref(), seed),
        Command::ListStrategies { json } => run_list_strategies(json),
        Command::Validate { config, ticker } => run_validate(&config, ticker.as_deref()),
        Command::Info { config, ticker } => run_info(&config, ticker.as_deref()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DripfeedError> {
    FileConfigAdapter::from_file(path).map_err(|e| DripfeedError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn resolve_ticker(
    ticker_override: Option<&str>,
    config: &dyn ConfigPort,
) -> Result<String, DripfeedError> {
    ticker_override
        .map(str::to_string)
        .or_else(|| config.get_string("data", "ticker"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DripfeedError::ConfigMissing {
            section: "data".into(),
            key: "ticker".into(),
        })
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<CsvPriceAdapter, DripfeedError> {
    let directory = config
        .get_string("data", "directory")
        .ok_or_else(|| DripfeedError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })?;
    let column = config
        .get_string("data", "price_column")
        .unwrap_or_else(|| DEFAULT_PRICE_COLUMN.to_string());
    Ok(CsvPriceAdapter::new(PathBuf::from(directory.trim())).with_price_column(&column))
}

/// One request per strategy name, all sharing the configured investment,
/// window and extra parameters.
pub fn build_requests(
    config: &dyn ConfigPort,
    strategy_overrides: &[String],
    seed: Option<u64>,
) -> Result<Vec<RunRequest>, DripfeedError> {
    let investment = investment_parameters(config)?;
    let (start, end) = section_dates(config, "investment")?;
    let mut parameters = strategy_parameters(config)?;
    if let Some(seed) = seed {
        parameters.insert(SEED_PARAMETER, seed as f64);
    }

    let names = if strategy_overrides.is_empty() {
        strategy_names(config)
    } else {
        strategy_overrides.to_vec()
    };
    if names.is_empty() {
        return Err(DripfeedError::ConfigMissing {
            section: "strategy".into(),
            key: "name".into(),
        });
    }

    Ok(names
        .into_iter()
        .map(|name| {
            RunRequest::new(name, investment.clone())
                .with_window(start, end)
                .with_parameters(parameters.clone())
        })
        .collect())
}

/// Load the series, evaluate every request and return the successful
/// reports. Fails only when no strategy succeeded.
pub fn run_pipeline(
    config: &dyn ConfigPort,
    data_port: &dyn PriceDataPort,
    ticker: &str,
    requests: &[RunRequest],
) -> Result<Vec<StrategyReport>, DripfeedError> {
    let (data_start, data_end) = section_dates(config, "data")?;
    let series = data_port.fetch_prices(ticker, data_start, data_end)?;
    info!(
        ticker,
        rows = series.len(),
        "evaluating {} strateg{}",
        requests.len(),
        if requests.len() == 1 { "y" } else { "ies" }
    );

    let mut reports = Vec::with_capacity(requests.len());
    let mut first_error = None;
    for (name, outcome) in run_comparison(requests, &series) {
        match outcome {
            Ok(report) => {
                for d in &report.diagnostics {
                    warn!(strategy = %name, "{d}");
                }
                reports.push(report);
            }
            Err(e) => {
                error!(strategy = %name, "{e}");
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if reports.is_empty() => Err(e),
        _ => Ok(reports),
    }
}

fn run_strategies(
    config_path: &Path,
    strategy_overrides: &[String],
    ticker_override: Option<&str>,
    output_path: Option<&PathBuf>,
    seed: Option<u64>,
) -> Result<(), DripfeedError> {
    info!("loading config from {}", config_path.display());
    let config = load_config(config_path)?;
    validate_run_config(&config, ticker_override, strategy_overrides)?;

    let ticker = resolve_ticker(ticker_override, &config)?;
    let data_port = build_data_port(&config)?;
    let requests = build_requests(&config, strategy_overrides, seed)?;
    let reports = run_pipeline(&config, &data_port, &ticker, &requests)?;

    print!("{}", comparison_table(&ticker, &reports));

    let output = output_path
        .map(|p| p.display().to_string())
        .or_else(|| config.get_string("report", "output"));
    if let Some(output) = output {
        let writer = report_adapter_for(&output)?;
        writer.write(&reports, report_date_format(&config)?, &output)?;
        info!("report written to {output}");
    }
    Ok(())
}

pub fn comparison_table(ticker: &str, reports: &[StrategyReport]) -> String {
    let mut out = format!("\n=== {ticker} ===\n");
    out.push_str(&format!(
        "{:<20} {:<10} {:<10} {:>7} {:>12} {:>12} {:>12} {:>9}\n",
        "Strategy", "Start", "End", "Held", "Invested", "Value", "Returns", "Return %"
    ));
    for r in reports {
        let s = &r.result.summary;
        out.push_str(&format!(
            "{:<20} {:<10} {:<10} {:>7} {:>12.2} {:>12.2} {:>12.2} {:>8.2}%\n",
            r.strategy,
            s.start_date,
            s.end_date,
            format_holding_duration(s.investment_time_days),
            s.total_invested,
            s.value,
            s.returns,
            s.percentage_returns,
        ));
    }
    out
}

fn run_list_strategies(json: bool) -> Result<(), DripfeedError> {
    if json {
        let listing =
            serde_json::to_string_pretty(&list_strategies()).map_err(|e| DripfeedError::Report {
                reason: format!("failed to serialize strategy list: {e}"),
            })?;
        println!("{listing}");
        return Ok(());
    }

    for entry in registry::entries() {
        println!("{}  {}", entry.name, entry.description);
        for p in entry.parameters {
            println!(
                "    {:<22} {:<18} default {}",
                p.name, p.label, p.default
            );
        }
    }
    Ok(())
}

fn run_validate(config_path: &Path, ticker_override: Option<&str>) -> Result<(), DripfeedError> {
    info!("validating {}", config_path.display());
    let config = load_config(config_path)?;
    validate_run_config(&config, ticker_override, &[])?;

    let investment = investment_parameters(&config)?;
    println!("ticker:     {}", resolve_ticker(ticker_override, &config)?);
    println!("strategies: {}", strategy_names(&config).join(", "));
    println!(
        "investment: {} initial, {} every {}",
        investment.initial_investment,
        investment.regular_investment,
        investment.regular_investment_frequency
    );
    println!("Configuration is valid.");
    Ok(())
}

fn run_info(config_path: &Path, ticker_override: Option<&str>) -> Result<(), DripfeedError> {
    let config = load_config(config_path)?;
    let ticker = resolve_ticker(ticker_override, &config)?;
    let data_port = build_data_port(&config)?;

    match data_port.get_data_range(&ticker)? {
        Some((first, last, count)) => {
            println!("{ticker}: {count} rows, {first} to {last}");
            Ok(())
        }
        None => Err(DripfeedError::NoData { ticker }),
    }
}
