//! Buy harder the faster the market is falling.
//!
//! Uses the frictionless velocity signal sampled on each schedule date.

use crate::domain::error::DripfeedError;
use crate::domain::signal::frictionless::{self, FrictionlessParams};
use crate::domain::strategy::{
    ParamKind, ParameterSpec, PlanContext, StrategyParameters, StrategyRun,
};

/// Unspent funds beyond this many regular amounts are drip-fed back in.
const BACKLOG_MULTIPLE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub min_velocity: f64,
    pub velocity_threshold: f64,
}

impl Velocity {
    pub const NAME: &'static str = "Velocity";
    pub const PARAMETERS: &'static [ParameterSpec] = &[
        ParameterSpec {
            name: "min_velocity",
            label: "Min Velocity",
            kind: ParamKind::Number,
            default: 0.0,
        },
        ParameterSpec {
            name: "velocity_threshold",
            label: "V Threshold",
            kind: ParamKind::Number,
            default: 4.0,
        },
    ];

    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, DripfeedError> {
        let min_velocity = params.number(&Self::PARAMETERS[0])?;
        if min_velocity < 0.0 {
            return Err(DripfeedError::invalid_parameter(
                "min_velocity",
                "must not be negative",
            ));
        }
        Ok(Self {
            min_velocity,
            velocity_threshold: params.positive(&Self::PARAMETERS[1])?,
        })
    }

    pub fn plan(&self, ctx: &PlanContext<'_>) -> StrategyRun {
        let mut plan = ctx.opening_plan();
        if !ctx.has_regular_investment() {
            return plan.into();
        }

        let signals = frictionless::signals(
            ctx.series,
            &FrictionlessParams {
                min_velocity: self.min_velocity,
                ..Default::default()
            },
        );
        let regular = ctx.investment.regular_investment;
        let dates = ctx.series.dates();

        for (k, row) in ctx.snapped_schedule().into_iter().enumerate() {
            let v_factor = signals.velocity[row] / self.velocity_threshold;
            let available = (k + 1) as f64 * regular - plan.total();

            if v_factor > 1.0 {
                let amount = v_factor.powi(4) * regular;
                if ctx.investment.allow_overdrawn || amount <= available {
                    plan.insert(dates[row], amount);
                }
            } else if available > BACKLOG_MULTIPLE * regular {
                plan.insert(dates[row], v_factor.powf(1.5) * regular);
            }
        }

        StrategyRun {
            plan,
            signals: Some(signals),
        }
    }
}
