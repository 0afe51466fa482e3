//! Configuration validation and decoding.
//!
//! Validates all config fields before a run, and decodes the investment and
//! strategy sections into domain values.

use crate::domain::encoding::DateFormat;
use crate::domain::error::DripfeedError;
use crate::domain::investment::InvestmentParameters;
use crate::domain::schedule::Frequency;
use crate::domain::strategy::StrategyParameters;
use crate::domain::strategy::registry;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

const NAME_KEYS: [&str; 2] = ["name", "names"];

/// `ticker_override` and `strategy_overrides` come from the command line
/// and stand in for `[data] ticker` and `[strategy] name(s)`.
pub fn validate_run_config(
    config: &dyn ConfigPort,
    ticker_override: Option<&str>,
    strategy_overrides: &[String],
) -> Result<(), DripfeedError> {
    validate_data(config, ticker_override)?;
    investment_parameters(config)?;
    section_dates(config, "investment")?;
    validate_strategies(config, strategy_overrides)?;
    validate_report(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DripfeedError {
    DripfeedError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, DripfeedError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(DripfeedError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}

fn validate_data(
    config: &dyn ConfigPort,
    ticker_override: Option<&str>,
) -> Result<(), DripfeedError> {
    required(config, "data", "directory")?;
    if ticker_override.is_none() {
        required(config, "data", "ticker")?;
    }
    if let Some(column) = config.get_string("data", "price_column") {
        if column.trim().is_empty() {
            return Err(invalid("data", "price_column", "price_column must not be empty"));
        }
    }
    let (start, end) = section_dates(config, "data")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "data",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

/// Optional `start_date` / `end_date` of `section`.
pub fn section_dates(
    config: &dyn ConfigPort,
    section: &str,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), DripfeedError> {
    let parse = |key: &str| match config.get_date(section, key) {
        None => Ok(None),
        Some(Ok(d)) => Ok(Some(d)),
        Some(Err(raw)) => Err(invalid(
            section,
            key,
            format!("invalid {key} '{raw}', expected YYYY-MM-DD"),
        )),
    };
    Ok((parse("start_date")?, parse("end_date")?))
}

fn amount(config: &dyn ConfigPort, key: &str) -> Result<f64, DripfeedError> {
    let Some(raw) = config.get_string("investment", key) else {
        return Ok(0.0);
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid("investment", key, format!("{key} must be a number")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            "investment",
            key,
            format!("{key} must be a non-negative amount"),
        ));
    }
    Ok(value)
}

pub fn investment_parameters(
    config: &dyn ConfigPort,
) -> Result<InvestmentParameters, DripfeedError> {
    let initial = amount(config, "initial_investment")?;
    let regular = amount(config, "regular_investment")?;
    let frequency = match config.get_string("investment", "frequency") {
        None => Frequency::Months,
        Some(raw) => raw
            .parse::<Frequency>()
            .map_err(|reason| invalid("investment", "frequency", reason))?,
    };
    if let Some(raw) = config.get_string("investment", "allow_overdrawn") {
        if !matches!(
            raw.trim().to_lowercase().as_str(),
            "true" | "yes" | "1" | "false" | "no" | "0"
        ) {
            return Err(invalid(
                "investment",
                "allow_overdrawn",
                "allow_overdrawn must be true or false",
            ));
        }
    }

    let mut investment = InvestmentParameters::new(initial, regular, frequency);
    investment.allow_overdrawn = config.get_bool("investment", "allow_overdrawn", false);
    Ok(investment)
}

/// Strategy names from `[strategy] names` (comma-separated) or `name`.
pub fn strategy_names(config: &dyn ConfigPort) -> Vec<String> {
    let listed = config
        .get_string("strategy", "names")
        .or_else(|| config.get_string("strategy", "name"))
        .unwrap_or_default();
    listed
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Every other key in `[strategy]` is an extra numeric parameter.
pub fn strategy_parameters(config: &dyn ConfigPort) -> Result<StrategyParameters, DripfeedError> {
    let mut params = StrategyParameters::new();
    for key in config.keys("strategy") {
        if NAME_KEYS.contains(&key.as_str()) {
            continue;
        }
        let raw = config.get_string("strategy", &key).unwrap_or_default();
        let value: f64 = raw
            .trim()
            .parse()
            .map_err(|_| invalid("strategy", &key, format!("{key} must be a number")))?;
        params.insert(&key, value);
    }
    Ok(params)
}

fn validate_strategies(
    config: &dyn ConfigPort,
    strategy_overrides: &[String],
) -> Result<(), DripfeedError> {
    let names = if strategy_overrides.is_empty() {
        strategy_names(config)
    } else {
        strategy_overrides.to_vec()
    };
    if names.is_empty() {
        return Err(DripfeedError::ConfigMissing {
            section: "strategy".to_string(),
            key: "name".to_string(),
        });
    }
    let params = strategy_parameters(config)?;
    for name in &names {
        let entry = registry::lookup(name)
            .map_err(|_| invalid("strategy", "name", format!("unknown strategy '{name}'")))?;
        entry.build(&params).map_err(|e| match e {
            DripfeedError::InvalidParameter { name, reason } => invalid("strategy", &name, reason),
            other => other,
        })?;
    }
    Ok(())
}

pub fn report_date_format(config: &dyn ConfigPort) -> Result<DateFormat, DripfeedError> {
    match config.get_string("report", "date_format") {
        None => Ok(DateFormat::Short),
        Some(raw) => raw
            .parse()
            .map_err(|reason| invalid("report", "date_format", reason)),
    }
}

fn validate_report(config: &dyn ConfigPort) -> Result<(), DripfeedError> {
    report_date_format(config)?;
    if let Some(output) = config.get_string("report", "output") {
        let lower = output.trim().to_lowercase();
        if !(lower.ends_with(".json") || lower.ends_with(".csv")) {
            return Err(invalid(
                "report",
                "output",
                "output must end in .json or .csv",
            ));
        }
    }
    Ok(())
}
