//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for dripfeed.
#[derive(Debug, thiserror::Error)]
pub enum DripfeedError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no price data for {ticker}")]
    NoData { ticker: String },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("unknown strategy: {name}")]
    UnknownStrategy { name: String },

    #[error("invalid strategy parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("no contribution plan to evaluate")]
    MissingPlan,

    #[error("plan date {date} is outside the price series ({first} to {last})")]
    PlanDateOutsideSeries {
        date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("non-finite value in column {column} at {date}")]
    NonFiniteValue { column: String, date: NaiveDate },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DripfeedError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        DripfeedError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&DripfeedError> for std::process::ExitCode {
    fn from(err: &DripfeedError) -> Self {
        let code: u8 = match err {
            DripfeedError::Io(_) => 1,
            DripfeedError::ConfigParse { .. }
            | DripfeedError::ConfigMissing { .. }
            | DripfeedError::ConfigInvalid { .. } => 2,
            DripfeedError::DataSource { .. } | DripfeedError::InvalidSeries { .. } => 3,
            DripfeedError::UnknownStrategy { .. } | DripfeedError::InvalidParameter { .. } => 4,
            DripfeedError::NoData { .. } => 5,
            DripfeedError::MissingPlan
            | DripfeedError::PlanDateOutsideSeries { .. }
            | DripfeedError::NonFiniteValue { .. }
            | DripfeedError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
