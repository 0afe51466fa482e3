//! JSON report adapter implementing ReportPort.
//!
//! Writes one object keyed by strategy name; each value carries the
//! investment echo, the summary, any window diagnostics and the annotated
//! series column by column.

use crate::domain::encoding::{DateFormat, StrategyDocument, encode_report};
use crate::domain::error::DripfeedError;
use crate::domain::runner::StrategyReport;
use crate::ports::report_port::ReportPort;
use std::collections::BTreeMap;
use std::fs;

pub struct JsonReportAdapter;

impl JsonReportAdapter {
    pub fn render(
        reports: &[StrategyReport],
        date_format: DateFormat,
    ) -> Result<String, DripfeedError> {
        let documents = reports
            .iter()
            .map(|r| Ok((r.strategy.clone(), encode_report(r, date_format)?)))
            .collect::<Result<BTreeMap<String, StrategyDocument>, DripfeedError>>()?;

        serde_json::to_string_pretty(&documents).map_err(|e| DripfeedError::Report {
            reason: format!("failed to serialize report: {e}"),
        })
    }
}

impl ReportPort for JsonReportAdapter {
    fn write(
        &self,
        reports: &[StrategyReport],
        date_format: DateFormat,
        output_path: &str,
    ) -> Result<(), DripfeedError> {
        let json = Self::render(reports, date_format)?;
        fs::write(output_path, json).map_err(|e| DripfeedError::Report {
            reason: format!("failed to write {output_path}: {e}"),
        })
    }
}
