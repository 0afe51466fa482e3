//! Turn a contribution plan into holdings, value and returns over time.
//!
//! The evaluator never touches the input series. It builds a fresh
//! [`EvaluatedRow`] per date, so one series can back any number of
//! evaluations.

use crate::domain::error::DripfeedError;
use crate::domain::nearest_date::nearest;
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::KinematicSignals;
use crate::domain::strategy::ContributionPlan;
use crate::domain::window::StrategyWindow;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatedRow {
    pub date: NaiveDate,
    pub price: f64,
    pub investment: f64,
    pub investment_cum: f64,
    pub units: f64,
    pub units_cum: f64,
    pub total_value: f64,
    pub returns: f64,
    pub percentage_returns: f64,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
    pub power: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub investment_time_days: i64,
    pub total_invested: f64,
    pub value: f64,
    pub returns: f64,
    pub percentage_returns: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub summary: EvaluationSummary,
    pub rows: Vec<EvaluatedRow>,
}

impl EvaluationResult {
    pub fn row_at(&self, date: NaiveDate) -> Option<&EvaluatedRow> {
        self.rows
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.rows[i])
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Contribution per series row. Plan dates snap to the nearest row; amounts
/// landing on the same row add up.
pub fn allocate(
    series: &PriceSeries,
    plan: &ContributionPlan,
) -> Result<Vec<f64>, DripfeedError> {
    let (first, last) = match (series.first_date(), series.last_date()) {
        (Some(f), Some(l)) => (f, l),
        _ => {
            return Err(DripfeedError::InvalidSeries {
                reason: "cannot evaluate an empty series".into(),
            });
        }
    };

    let mut investment = vec![0.0; series.len()];
    for (date, amount) in plan.iter() {
        if date < first || date > last {
            return Err(DripfeedError::PlanDateOutsideSeries { date, first, last });
        }
        let row = nearest(series.dates(), date)
            .and_then(|d| series.index_of(d))
            .ok_or(DripfeedError::PlanDateOutsideSeries { date, first, last })?;
        investment[row] += amount;
    }
    Ok(investment)
}

pub fn evaluate(
    series: &PriceSeries,
    plan: &ContributionPlan,
    window: &StrategyWindow,
    signals: Option<&KinematicSignals>,
) -> Result<EvaluationResult, DripfeedError> {
    if plan.is_empty() {
        return Err(DripfeedError::MissingPlan);
    }
    let investment = allocate(series, plan)?;

    let column = |col: Option<&Vec<f64>>, i: usize| col.and_then(|c| c.get(i)).copied();
    let velocity = signals.map(|s| &s.velocity);
    let acceleration = signals.and_then(|s| s.acceleration.as_ref());
    let power = signals.and_then(|s| s.power.as_ref());

    let mut rows = Vec::with_capacity(series.len());
    let mut investment_cum = 0.0;
    let mut units_cum = 0.0;

    for (i, point) in series.points().enumerate() {
        let invested = investment[i];
        let units = invested / point.price;
        investment_cum += invested;
        units_cum += units;
        let total_value = units_cum * point.price;
        let returns = total_value - investment_cum;
        let percentage_returns = if investment_cum == 0.0 {
            0.0
        } else {
            (total_value / investment_cum - 1.0) * 100.0
        };

        rows.push(EvaluatedRow {
            date: point.date,
            price: point.price,
            investment: invested,
            investment_cum,
            units,
            units_cum,
            total_value,
            returns,
            percentage_returns,
            velocity: column(velocity, i),
            acceleration: column(acceleration, i),
            power: column(power, i),
        });
    }

    let result = EvaluationResult {
        summary: summarise(&rows, window)?,
        rows,
    };
    Ok(result)
}

fn summarise(
    rows: &[EvaluatedRow],
    window: &StrategyWindow,
) -> Result<EvaluationSummary, DripfeedError> {
    let end = rows
        .binary_search_by_key(&window.end_date, |r| r.date)
        .map(|i| &rows[i])
        .map_err(|_| DripfeedError::InvalidSeries {
            reason: format!("window end {} is not a series date", window.end_date),
        })?;

    Ok(EvaluationSummary {
        start_date: window.start_date,
        end_date: window.end_date,
        investment_time_days: window.days(),
        total_invested: end.investment_cum,
        value: round2(end.total_value),
        returns: round2(end.returns),
        percentage_returns: round2(end.percentage_returns),
    })
}
