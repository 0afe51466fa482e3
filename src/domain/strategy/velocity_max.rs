//! Wait for a fast fall, then buy into the rebound.
//!
//! Runs the drag-limited model over every row in the window. Schedule dates
//! only top up a cash pool. While velocity is above the current threshold an
//! investment window is open, and each row whose power clears
//! `power_threshold` spends a growing fraction of the pool. Every purchase
//! raises the velocity threshold; once velocity is no longer above it, both
//! the threshold and the fraction reset.

use crate::domain::error::DripfeedError;
use crate::domain::signal::drag::{self, DragParams};
use crate::domain::strategy::{
    ParamKind, ParameterSpec, PlanContext, StrategyParameters, StrategyRun,
};

const BASE_FRACTION: f64 = 0.1;
const THRESHOLD_STEP: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityMax {
    pub velocity_threshold: f64,
    pub power_threshold: f64,
}

impl VelocityMax {
    pub const NAME: &'static str = "VelocityMax";
    pub const PARAMETERS: &'static [ParameterSpec] = &[
        ParameterSpec {
            name: "velocity_threshold",
            label: "V Threshold",
            kind: ParamKind::Number,
            default: 4.0,
        },
        ParameterSpec {
            name: "power_threshold",
            label: "P Threshold",
            kind: ParamKind::Number,
            default: 0.01,
        },
    ];

    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, DripfeedError> {
        Ok(Self {
            velocity_threshold: params.number(&Self::PARAMETERS[0])?,
            power_threshold: params.number(&Self::PARAMETERS[1])?,
        })
    }

    pub fn plan(&self, ctx: &PlanContext<'_>) -> StrategyRun {
        let mut plan = ctx.opening_plan();
        if !ctx.has_regular_investment() {
            return plan.into();
        }

        let signals = drag::signals(ctx.series, &DragParams::default());
        let velocity = &signals.velocity;
        let power = signals.power.as_deref().unwrap_or_default();
        let dates = ctx.series.dates();
        let top_ups = ctx.snapped_schedule();

        let mut next_top_up = 0;
        let mut pool = 0.0;
        let mut fraction = BASE_FRACTION;
        let mut threshold = self.velocity_threshold;

        for (row, &date) in dates.iter().enumerate() {
            if !ctx.window.contains(date) {
                continue;
            }
            while next_top_up < top_ups.len() && top_ups[next_top_up] == row {
                pool += ctx.investment.regular_investment;
                next_top_up += 1;
            }

            if velocity[row] > threshold {
                if power.get(row).is_some_and(|p| *p > self.power_threshold) {
                    let amount = (fraction.min(1.0) * pool).min(pool);
                    if amount > 0.0 {
                        plan.insert(date, amount);
                        pool -= amount;
                        fraction += BASE_FRACTION;
                        threshold += THRESHOLD_STEP;
                    }
                }
            } else {
                fraction = BASE_FRACTION;
                threshold = self.velocity_threshold;
            }
        }

        StrategyRun {
            plan,
            signals: Some(signals),
        }
    }
}
