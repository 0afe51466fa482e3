//! Regular schedule, but each contribution happens only on a coin flip.

use crate::domain::error::DripfeedError;
use crate::domain::strategy::{
    ContributionPlan, ParamKind, ParameterSpec, PlanContext, StrategyParameters,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Not part of the descriptor; lets callers reproduce a run.
pub const SEED_PARAMETER: &str = "seed";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomInvestment {
    pub randomness: f64,
    pub seed: Option<u64>,
}

impl RandomInvestment {
    pub const NAME: &'static str = "RandomInvestment";
    pub const PARAMETERS: &'static [ParameterSpec] = &[ParameterSpec {
        name: "randomness",
        label: "Randomness Rate",
        kind: ParamKind::Number,
        default: 0.5,
    }];

    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, DripfeedError> {
        let randomness = params.number(&Self::PARAMETERS[0])?;
        if !(0.0..=1.0).contains(&randomness) {
            return Err(DripfeedError::invalid_parameter(
                "randomness",
                format!("must be between 0 and 1, got {randomness}"),
            ));
        }

        let seed = match params.get(SEED_PARAMETER) {
            Some(s) if s >= 0.0 && s.fract() == 0.0 => Some(s as u64),
            Some(s) => {
                return Err(DripfeedError::invalid_parameter(
                    SEED_PARAMETER,
                    format!("must be a non-negative whole number, got {s}"),
                ));
            }
            None => None,
        };

        Ok(Self { randomness, seed })
    }

    pub fn plan(&self, ctx: &PlanContext<'_>) -> ContributionPlan {
        let mut plan = ctx.opening_plan();
        if !ctx.has_regular_investment() {
            return plan;
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        for date in ctx.regular_schedule() {
            if rng.gen_bool(self.randomness) {
                plan.insert(date, ctx.investment.regular_investment);
            }
        }
        plan
    }
}
