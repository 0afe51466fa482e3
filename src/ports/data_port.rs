//! Price data access port trait.

use crate::domain::error::DripfeedError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait PriceDataPort {
    /// Daily prices for `ticker`, ascending, optionally limited to `[start, end]`.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, DripfeedError>;

    /// First date, last date and row count, or `None` when the ticker has no rows.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DripfeedError>;
}
