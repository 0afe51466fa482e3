//! Kinematic signals derived from a price series.
//!
//! Price over time is treated as the height profile of a track and a body is
//! rolled along it. Two models are provided:
//! - [`frictionless`]: energy conservation only, giving velocity
//! - [`drag`]: closed-form solutions of the drag ODE, giving velocity,
//!   acceleration and power
//!
//! Every column is aligned to the series' date index.

pub mod drag;
pub mod frictionless;

use crate::domain::price_series::PriceSeries;

/// Derived columns attached to an evaluation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KinematicSignals {
    pub velocity: Vec<f64>,
    pub acceleration: Option<Vec<f64>>,
    pub power: Option<Vec<f64>>,
}

/// Seconds between consecutive dates; the first entry is NaN.
pub(crate) fn time_steps(series: &PriceSeries) -> Vec<f64> {
    let dates = series.dates();
    let mut steps = Vec::with_capacity(dates.len());
    if dates.is_empty() {
        return steps;
    }
    steps.push(f64::NAN);
    for pair in dates.windows(2) {
        steps.push((pair[1] - pair[0]).num_seconds() as f64);
    }
    steps
}

/// Mean of the finite values, NaN if there are none.
pub(crate) fn finite_mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { f64::NAN } else { sum / count as f64 }
}

/// Trailing mean over `period` values. Entries with fewer than
/// `min_periods` finite values in their window are NaN.
pub(crate) fn rolling_mean(values: &[f64], period: usize, min_periods: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if period == 0 {
        out.resize(values.len(), f64::NAN);
        return out;
    }
    for i in 0..values.len() {
        let lo = (i + 1).saturating_sub(period);
        let window = &values[lo..=i];
        let finite = window.iter().filter(|v| v.is_finite()).count();
        if finite >= min_periods.max(1) {
            out.push(finite_mean(window));
        } else {
            out.push(f64::NAN);
        }
    }
    out
}
