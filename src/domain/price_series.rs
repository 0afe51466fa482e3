//! Date-indexed price series.
//!
//! A `PriceSeries` is strictly increasing by date with one finite, positive
//! price per date. The engine only ever borrows it; derived columns live in separate
//! records built per evaluation.

use crate::domain::error::DripfeedError;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    prices: Vec<f64>,
}

impl PriceSeries {
    /// Build a series from points already sorted by date.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, DripfeedError> {
        let mut dates = Vec::with_capacity(points.len());
        let mut prices = Vec::with_capacity(points.len());

        for point in points {
            if !point.price.is_finite() {
                return Err(DripfeedError::InvalidSeries {
                    reason: format!("non-finite price on {}", point.date),
                });
            }
            if point.price <= 0.0 {
                return Err(DripfeedError::InvalidSeries {
                    reason: format!("price {} on {} is not positive", point.price, point.date),
                });
            }
            if let Some(&prev) = dates.last() {
                if point.date <= prev {
                    return Err(DripfeedError::InvalidSeries {
                        reason: format!(
                            "dates must be strictly increasing ({} follows {})",
                            point.date, prev
                        ),
                    });
                }
            }
            dates.push(point.date);
            prices.push(point.price);
        }

        Ok(Self { dates, prices })
    }

    /// Sort points by date, then build the series.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, DripfeedError> {
        points.sort_by_key(|p| p.date);
        Self::new(points)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn points(&self) -> impl Iterator<Item = PricePoint> + '_ {
        self.dates
            .iter()
            .zip(&self.prices)
            .map(|(&date, &price)| PricePoint { date, price })
    }

    /// Restrict to `[start, end]`; either bound may be open.
    pub fn filter_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let lo = start.map_or(0, |s| self.dates.partition_point(|d| *d < s));
        let hi = end.map_or(self.dates.len(), |e| self.dates.partition_point(|d| *d <= e));
        let hi = hi.max(lo);
        Self {
            dates: self.dates[lo..hi].to_vec(),
            prices: self.prices[lo..hi].to_vec(),
        }
    }
}

/// Drop every point at or before the last price of exactly zero.
///
/// Data providers mark missing history with a zero price; anything up to
/// and including the last such marker is unusable.
pub fn discard_through_last_zero(points: Vec<PricePoint>) -> Vec<PricePoint> {
    match points.iter().rposition(|p| p.price == 0.0) {
        Some(last_zero) => points.into_iter().skip(last_zero + 1).collect(),
        None => points,
    }
}
