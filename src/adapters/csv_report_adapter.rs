//! CSV report adapter implementing ReportPort.
//!
//! One row per date per strategy. Signal columns are left empty for
//! strategies that do not derive them.

use crate::domain::encoding::{DateFormat, SERIES_COLUMNS, encode_series};
use crate::domain::error::DripfeedError;
use crate::domain::runner::StrategyReport;
use crate::ports::report_port::ReportPort;
use std::fs;

pub struct CsvReportAdapter;

fn csv_error(e: impl std::fmt::Display) -> DripfeedError {
    DripfeedError::Report {
        reason: format!("CSV write error: {e}"),
    }
}

impl CsvReportAdapter {
    pub fn render(
        reports: &[StrategyReport],
        date_format: DateFormat,
    ) -> Result<String, DripfeedError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        let header = std::iter::once("strategy").chain(SERIES_COLUMNS);
        wtr.write_record(header).map_err(csv_error)?;

        for report in reports {
            let cols = encode_series(&report.result, date_format)?;
            for i in 0..cols.len() {
                let record = std::iter::once(report.strategy.clone()).chain(cols.record(i));
                wtr.write_record(record).map_err(csv_error)?;
            }
        }

        let data = wtr.into_inner().map_err(csv_error)?;
        String::from_utf8(data).map_err(csv_error)
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        reports: &[StrategyReport],
        date_format: DateFormat,
        output_path: &str,
    ) -> Result<(), DripfeedError> {
        let csv = Self::render(reports, date_format)?;
        fs::write(output_path, csv).map_err(|e| DripfeedError::Report {
            reason: format!("failed to write {output_path}: {e}"),
        })
    }
}
