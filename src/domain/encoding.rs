//! Column-wise rendering of evaluation results for reports.

use crate::domain::error::DripfeedError;
use crate::domain::evaluator::{EvaluatedRow, EvaluationResult, EvaluationSummary};
use crate::domain::investment::InvestmentSummary;
use crate::domain::runner::StrategyReport;
use crate::domain::window::WindowDiagnostic;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const DAYS_PER_YEAR: f64 = 365.2425;
const DAYS_PER_MONTH: f64 = 30.437;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFormat {
    #[default]
    Short,
    Long,
}

impl DateFormat {
    pub fn format(&self, date: NaiveDate) -> String {
        match self {
            DateFormat::Short => date.format("%Y-%m-%d").to_string(),
            DateFormat::Long => date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().format("%Y-%m-%d %H:%M:%S %Z").to_string())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Short => write!(f, "short"),
            DateFormat::Long => write!(f, "long"),
        }
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(DateFormat::Short),
            "long" => Ok(DateFormat::Long),
            other => Err(format!("unknown date format '{other}', expected short or long")),
        }
    }
}

/// Column names of the annotated series, in output order.
pub const SERIES_COLUMNS: [&str; 12] = [
    "date",
    "price",
    "investment",
    "investment_cum",
    "units",
    "units_cum",
    "total_value",
    "returns",
    "percentage_returns",
    "velocity",
    "acceleration",
    "power",
];

/// The annotated series, one vector per column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesColumns {
    pub date: Vec<String>,
    pub price: Vec<f64>,
    pub investment: Vec<f64>,
    pub investment_cum: Vec<f64>,
    pub units: Vec<f64>,
    pub units_cum: Vec<f64>,
    pub total_value: Vec<f64>,
    pub returns: Vec<f64>,
    pub percentage_returns: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acceleration: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<Vec<f64>>,
}

impl SeriesColumns {
    pub fn len(&self) -> usize {
        self.date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }

    /// Row `i` as strings, aligned with [`SERIES_COLUMNS`]. Absent signal
    /// columns are empty strings.
    pub fn record(&self, i: usize) -> Vec<String> {
        let mut record = vec![
            self.date[i].clone(),
            self.price[i].to_string(),
            self.investment[i].to_string(),
            self.investment_cum[i].to_string(),
            self.units[i].to_string(),
            self.units_cum[i].to_string(),
            self.total_value[i].to_string(),
            self.returns[i].to_string(),
            self.percentage_returns[i].to_string(),
        ];
        for column in [&self.velocity, &self.acceleration, &self.power] {
            record.push(column.as_ref().map(|c| c[i].to_string()).unwrap_or_default());
        }
        record
    }
}

fn check_finite(rows: &[EvaluatedRow]) -> Result<(), DripfeedError> {
    for row in rows {
        let values = [
            ("price", Some(row.price)),
            ("investment", Some(row.investment)),
            ("investment_cum", Some(row.investment_cum)),
            ("units", Some(row.units)),
            ("units_cum", Some(row.units_cum)),
            ("total_value", Some(row.total_value)),
            ("returns", Some(row.returns)),
            ("percentage_returns", Some(row.percentage_returns)),
            ("velocity", row.velocity),
            ("acceleration", row.acceleration),
            ("power", row.power),
        ];
        for (column, value) in values {
            if value.is_some_and(|v| !v.is_finite()) {
                return Err(DripfeedError::NonFiniteValue {
                    column: column.to_string(),
                    date: row.date,
                });
            }
        }
    }
    Ok(())
}

/// Fails on the first NaN or infinite value in any column.
pub fn encode_series(
    result: &EvaluationResult,
    format: DateFormat,
) -> Result<SeriesColumns, DripfeedError> {
    let rows = &result.rows;
    check_finite(rows)?;

    let column = |f: fn(&EvaluatedRow) -> f64| rows.iter().map(f).collect::<Vec<_>>();
    let signal = |f: fn(&EvaluatedRow) -> Option<f64>| {
        rows.iter().map(f).collect::<Option<Vec<_>>>()
    };

    Ok(SeriesColumns {
        date: rows.iter().map(|r| format.format(r.date)).collect(),
        price: column(|r| r.price),
        investment: column(|r| r.investment),
        investment_cum: column(|r| r.investment_cum),
        units: column(|r| r.units),
        units_cum: column(|r| r.units_cum),
        total_value: column(|r| r.total_value),
        returns: column(|r| r.returns),
        percentage_returns: column(|r| r.percentage_returns),
        velocity: signal(|r| r.velocity),
        acceleration: signal(|r| r.acceleration),
        power: signal(|r| r.power),
    })
}

/// One strategy's entry in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyDocument {
    pub investment: InvestmentSummary,
    pub summary: EvaluationSummary,
    pub diagnostics: Vec<WindowDiagnostic>,
    pub data: SeriesColumns,
}

pub fn encode_report(
    report: &StrategyReport,
    format: DateFormat,
) -> Result<StrategyDocument, DripfeedError> {
    Ok(StrategyDocument {
        investment: report.investment.clone(),
        summary: report.result.summary.clone(),
        diagnostics: report.diagnostics.clone(),
        data: encode_series(&report.result, format)?,
    })
}

/// Compact holding duration: the largest non-zero unit of years, months,
/// weeks and days plus the next one down when non-zero, e.g. `3Y 2M`.
pub fn format_holding_duration(days: i64) -> String {
    let total = days.max(0) as f64;
    let years = (total / DAYS_PER_YEAR).floor();
    let rest = total - years * DAYS_PER_YEAR;
    let months = (rest / DAYS_PER_MONTH).floor();
    let rest = rest - months * DAYS_PER_MONTH;
    let weeks = (rest / 7.0).floor();
    let rest_days = (rest - weeks * 7.0).floor();

    let parts: Vec<String> = [
        (years, "Y"),
        (months, "M"),
        (weeks, "W"),
        (rest_days, "D"),
    ]
    .into_iter()
    .skip_while(|(n, _)| *n == 0.0)
    .take(2)
    .filter(|(n, _)| *n > 0.0)
    .map(|(n, unit)| format!("{}{unit}", n as i64))
    .collect();

    if parts.is_empty() {
        "0D".to_string()
    } else {
        parts.join(" ")
    }
}
