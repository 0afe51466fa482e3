#![allow(dead_code)]

use chrono::NaiveDate;
use dripfeed::domain::error::DripfeedError;
pub use dripfeed::domain::price_series::{PricePoint, PriceSeries};
use dripfeed::ports::data_port::PriceDataPort;
use std::collections::HashMap;

pub struct MockPriceDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPriceDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_prices(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(ticker.to_string(), points);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl PriceDataPort for MockPriceDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, DripfeedError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(DripfeedError::DataSource {
                reason: reason.clone(),
            });
        }
        let points = self
            .data
            .get(ticker)
            .cloned()
            .ok_or_else(|| DripfeedError::NoData {
                ticker: ticker.to_string(),
            })?;
        let series = PriceSeries::from_unsorted(points)?.filter_range(start_date, end_date);
        if series.is_empty() {
            return Err(DripfeedError::NoData {
                ticker: ticker.to_string(),
            });
        }
        Ok(series)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DripfeedError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(DripfeedError::DataSource {
                reason: reason.clone(),
            });
        }
        match self.data.get(ticker) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive calendar days from `start`.
pub fn daily_points(start: NaiveDate, prices: &[f64]) -> Vec<PricePoint> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
        .collect()
}

pub fn daily_series(start: NaiveDate, prices: &[f64]) -> PriceSeries {
    PriceSeries::new(daily_points(start, prices)).unwrap()
}

/// Monday-to-Friday rows from `start` with a gentle saw-tooth price.
pub fn trading_days(start: NaiveDate, count: usize) -> Vec<PricePoint> {
    use chrono::{Datelike, Weekday};
    start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .enumerate()
        .map(|(i, d)| {
            let wave = ((i % 40) as f64 - 20.0).abs();
            PricePoint::new(d, 100.0 + wave + i as f64 * 0.05)
        })
        .collect()
}

pub const FALLING: [f64; 10] = [100.0, 101.0, 99.0, 98.0, 97.0, 96.0, 95.0, 94.0, 93.0, 92.0];
