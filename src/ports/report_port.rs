//! Report output port trait.

use crate::domain::encoding::DateFormat;
use crate::domain::error::DripfeedError;
use crate::domain::runner::StrategyReport;

/// Port for writing evaluated strategies to a file.
pub trait ReportPort {
    fn write(
        &self,
        reports: &[StrategyReport],
        date_format: DateFormat,
        output_path: &str,
    ) -> Result<(), DripfeedError>;
}
