//! Drag-limited velocity model.
//!
//! The track height is measured against a short moving average of price to
//! damp noise. Time steps are rescaled so the steepest observed gradient
//! equals `max_gradient`. Per step the body either coasts on the flat
//! (drag only), climbs (tangent solution of m·v' = -m·g·sin θ - c·v²) or
//! descends (hyperbolic tangent solution with |θ|).
//!
//! Velocity is finally divided by a trailing mean of price so it is
//! comparable across instruments; acceleration is the smoothed discrete
//! derivative of the raw velocity, and power = velocity × acceleration.

use crate::domain::price_series::PriceSeries;
use crate::domain::signal::{KinematicSignals, rolling_mean, time_steps};

const FLAT_ANGLE: f64 = 1e-2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragParams {
    pub min_velocity: f64,
    pub mass: f64,
    pub gravity: f64,
    pub drag_coefficient: f64,
    pub max_gradient: f64,
    pub moving_average_period: usize,
    pub normalise_window: usize,
}

impl Default for DragParams {
    fn default() -> Self {
        Self {
            min_velocity: 0.0,
            mass: 1e3,
            gravity: 10.0,
            drag_coefficient: 1e-9,
            max_gradient: 0.9,
            moving_average_period: 5,
            normalise_window: 180,
        }
    }
}

impl DragParams {
    fn step(&self, v_prev: f64, theta: f64, dt: f64) -> f64 {
        let (m, g, c) = (self.mass, self.gravity, self.drag_coefficient);
        let next = if !theta.is_finite() {
            self.min_velocity
        } else if theta.abs() < FLAT_ANGLE {
            v_prev / (c * v_prev * dt + 1.0)
        } else {
            let slope = theta.abs().sin();
            let k1 = (m * g * slope / c).sqrt();
            let k2 = (c * g * slope / m).sqrt();
            if theta > 0.0 {
                let phase = (v_prev / k1).atan();
                k1 * (phase - dt * k2).tan()
            } else {
                let phase = (v_prev / k1).atanh();
                k1 * (phase + dt * k2).tanh()
            }
        };

        if !next.is_finite() || next < self.min_velocity {
            self.min_velocity
        } else {
            next
        }
    }
}

pub fn signals(series: &PriceSeries, params: &DragParams) -> KinematicSignals {
    let n = series.len();
    if n == 0 {
        return KinematicSignals {
            velocity: Vec::new(),
            acceleration: Some(Vec::new()),
            power: Some(Vec::new()),
        };
    }

    let prices = series.prices();
    let period = params.moving_average_period;
    let dx = time_steps(series);
    let reference = rolling_mean(prices, period, period);

    let dy: Vec<f64> = (0..n)
        .map(|i| if i == 0 { f64::NAN } else { prices[i] - reference[i - 1] })
        .collect();

    let steepest = dy
        .iter()
        .zip(&dx)
        .map(|(y, x)| y / x)
        .filter(|g| g.is_finite())
        .fold(f64::NAN, f64::max);
    let factor = if steepest.is_finite() && steepest != 0.0 {
        steepest.abs() / params.max_gradient
    } else {
        1.0
    };
    let dt: Vec<f64> = dx.iter().map(|x| x * factor).collect();

    let mut raw_v = Vec::with_capacity(n);
    let mut raw_a = Vec::with_capacity(n);
    raw_v.push(params.min_velocity);
    raw_a.push(params.min_velocity);

    for i in 1..n {
        let theta = (dy[i] / dt[i]).atan();
        let v_prev = raw_v[i - 1];
        let v = params.step(v_prev, theta, dt[i]);
        raw_a.push(((v - v_prev) / dt[i]) / params.mass);
        raw_v.push(v);
    }

    let price_level = rolling_mean(prices, params.normalise_window, 1);
    let velocity: Vec<f64> = raw_v
        .iter()
        .zip(&price_level)
        .map(|(v, level)| v / level)
        .collect();
    let acceleration = rolling_mean(&raw_a, period, 1);
    let power = velocity
        .iter()
        .zip(&acceleration)
        .map(|(v, a)| v * a)
        .collect();

    KinematicSignals {
        velocity,
        acceleration: Some(acceleration),
        power: Some(power),
    }
}
