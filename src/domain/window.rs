//! Strategy window resolution.
//!
//! Caller-supplied bounds are corrected rather than rejected: an inverted
//! pair of bounds is swapped and bounds outside the data are clamped. Missing
//! bounds default to the ends of the series and are never reported. Each correction is
//! returned as a [`WindowDiagnostic`] and logged at warn level.

use crate::domain::error::DripfeedError;
use crate::domain::nearest_date::{nearest_future, nearest_past};
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowDiagnostic {
    Swapped {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    StartClamped {
        requested: NaiveDate,
        used: NaiveDate,
    },
    EndClamped {
        requested: NaiveDate,
        used: NaiveDate,
    },
}

impl fmt::Display for WindowDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowDiagnostic::Swapped {
                start_date,
                end_date,
            } => write!(
                f,
                "start {start_date} was after end {end_date}, swapped them"
            ),
            WindowDiagnostic::StartClamped { requested, used } => write!(
                f,
                "no data around start {requested}, using {used}"
            ),
            WindowDiagnostic::EndClamped { requested, used } => {
                write!(f, "no data around end {requested}, using {used}")
            }
        }
    }
}

impl StrategyWindow {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Holding duration in whole days.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Resolve optional bounds against the series. Both resolved dates exist
    /// in the series and `start_date <= end_date`.
    pub fn resolve(
        series: &PriceSeries,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<(Self, Vec<WindowDiagnostic>), DripfeedError> {
        let (first, last) = match (series.first_date(), series.last_date()) {
            (Some(f), Some(l)) => (f, l),
            _ => {
                return Err(DripfeedError::InvalidSeries {
                    reason: "cannot resolve a window on an empty series".into(),
                });
            }
        };

        let mut diagnostics = Vec::new();
        let (mut start, mut end) = (start, end);

        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                diagnostics.push(WindowDiagnostic::Swapped {
                    start_date: s,
                    end_date: e,
                });
                (start, end) = (Some(e), Some(s));
            }
        }

        let clamped_start = match start {
            Some(requested) => {
                let used = requested.clamp(first, last);
                if used != requested {
                    diagnostics.push(WindowDiagnostic::StartClamped { requested, used });
                }
                used
            }
            None => first,
        };
        let clamped_end = match end {
            Some(requested) => {
                let used = requested.clamp(first, last);
                if used != requested {
                    diagnostics.push(WindowDiagnostic::EndClamped { requested, used });
                }
                used
            }
            None => last,
        };

        let dates = series.dates();
        let start_date = nearest_future(dates, clamped_start).unwrap_or(first);
        let end_date = nearest_past(dates, clamped_end)
            .unwrap_or(last)
            .max(start_date);

        for d in &diagnostics {
            warn!("window corrected: {d}");
        }

        Ok((Self::new(start_date, end_date), diagnostics))
    }
}
