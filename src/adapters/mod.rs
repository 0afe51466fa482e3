//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
pub mod json_report_adapter;

use crate::domain::error::DripfeedError;
use crate::ports::report_port::ReportPort;

/// Pick the report writer from the output file extension.
pub fn report_adapter_for(output_path: &str) -> Result<Box<dyn ReportPort>, DripfeedError> {
    let lower = output_path.to_lowercase();
    if lower.ends_with(".json") {
        Ok(Box::new(json_report_adapter::JsonReportAdapter))
    } else if lower.ends_with(".csv") {
        Ok(Box::new(csv_report_adapter::CsvReportAdapter))
    } else {
        Err(DripfeedError::Report {
            reason: format!("unsupported report format for {output_path}, use .json or .csv"),
        })
    }
}
