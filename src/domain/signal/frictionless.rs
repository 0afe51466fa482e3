//! Frictionless velocity model.
//!
//! Each (time, price) step is a ramp. Time steps are rescaled by a single
//! series-wide factor, mean(price step) / mean(time step), so both axes share
//! a scale. Along a ramp of angle θ and length s the body accelerates at
//! a = -g·sin θ and v² grows by 2·a·s.

use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{KinematicSignals, finite_mean, time_steps};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionlessParams {
    pub min_velocity: f64,
    pub gravity: f64,
}

impl Default for FrictionlessParams {
    fn default() -> Self {
        Self {
            min_velocity: 0.0,
            gravity: 10.0,
        }
    }
}

pub fn velocity(series: &PriceSeries, params: &FrictionlessParams) -> Vec<f64> {
    let n = series.len();
    let min = params.min_velocity;
    if n == 0 {
        return Vec::new();
    }

    let prices = series.prices();
    let dx = time_steps(series);
    let dy: Vec<f64> = std::iter::once(f64::NAN)
        .chain(prices.windows(2).map(|w| w[1] - w[0]))
        .collect();

    let factor = finite_mean(&dy[1..]) / finite_mean(&dx[1..]);
    if !factor.is_finite() {
        return vec![min; n];
    }

    let mut v = Vec::with_capacity(n);
    v.push(min);
    for i in 1..n {
        let x = dx[i] * factor;
        let y = dy[i];
        let theta = if x == 0.0 && y == 0.0 { 0.0 } else { (y / x).atan() };
        let s = (x * x + y * y).sqrt();
        let a = -params.gravity * theta.sin();

        let radicand = v[i - 1] * v[i - 1] + 2.0 * a * s;
        let next = if radicand.is_finite() && radicand >= 0.0 {
            radicand.sqrt().max(min)
        } else {
            min
        };
        v.push(next);
    }
    v
}

pub fn signals(series: &PriceSeries, params: &FrictionlessParams) -> KinematicSignals {
    KinematicSignals {
        velocity: velocity(series, params),
        acceleration: None,
        power: None,
    }
}
