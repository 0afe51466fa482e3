//! CSV file price data adapter.
//!
//! One file per ticker, `<directory>/<TICKER>.csv`, with a header row holding
//! a `date` column (YYYY-MM-DD) and the configured price column.

use crate::domain::error::DripfeedError;
use crate::domain::price_series::{PricePoint, PriceSeries, discard_through_last_zero};
use crate::ports::data_port::PriceDataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_PRICE_COLUMN: &str = "open";

pub struct CsvPriceAdapter {
    base_path: PathBuf,
    price_column: String,
}

impl CsvPriceAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            base_path,
            price_column: DEFAULT_PRICE_COLUMN.to_string(),
        }
    }

    pub fn with_price_column(mut self, column: &str) -> Self {
        self.price_column = column.trim().to_string();
        self
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// All rows of the file, sorted by date, before any filtering.
    fn read_points(&self, ticker: &str) -> Result<Option<Vec<PricePoint>>, DripfeedError> {
        let path = self.csv_path(ticker);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(|e| DripfeedError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| DripfeedError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| DripfeedError::DataSource {
                    reason: format!("{} has no '{}' column", path.display(), name),
                })
        };
        let date_idx = column("date")?;
        let price_idx = column(&self.price_column)?;

        let mut points = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DripfeedError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_idx).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                DripfeedError::DataSource {
                    reason: format!("invalid date '{}': {}", date_str, e),
                }
            })?;

            let price_str = record.get(price_idx).unwrap_or_default().trim();
            if price_str.is_empty() || price_str.eq_ignore_ascii_case("null") {
                debug!(ticker, %date, "skipping row without a price");
                continue;
            }
            let price: f64 = price_str.parse().map_err(|e| DripfeedError::DataSource {
                reason: format!("invalid {} value '{}' on {}: {}", self.price_column, price_str, date, e),
            })?;

            points.push(PricePoint::new(date, price));
        }

        points.sort_by_key(|p| p.date);
        Ok(Some(points))
    }
}

impl PriceDataPort for CsvPriceAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, DripfeedError> {
        let points = self
            .read_points(ticker)?
            .ok_or_else(|| DripfeedError::NoData {
                ticker: ticker.to_string(),
            })?;

        let in_range: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| start_date.is_none_or(|s| p.date >= s))
            .filter(|p| end_date.is_none_or(|e| p.date <= e))
            .collect();
        let series = PriceSeries::new(discard_through_last_zero(in_range))?;

        if series.is_empty() {
            return Err(DripfeedError::NoData {
                ticker: ticker.to_string(),
            });
        }
        debug!(ticker, rows = series.len(), "loaded prices");
        Ok(series)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DripfeedError> {
        let Some(points) = self.read_points(ticker)? else {
            return Ok(None);
        };
        Ok(match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, points.len())),
            _ => None,
        })
    }
}
