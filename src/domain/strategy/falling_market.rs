//! Save while the market holds up, deploy everything on a sharp fall.
//!
//! Each schedule step either adds the regular amount to a cash pool, or, if
//! price has dropped below `threshold_percentage` of its level
//! `search_range` steps earlier, invests the whole pool.

use crate::domain::error::DripfeedError;
use crate::domain::strategy::{
    ContributionPlan, ParamKind, ParameterSpec, PlanContext, StrategyParameters,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingMarket {
    pub search_range: usize,
    pub threshold_percentage: f64,
}

impl FallingMarket {
    pub const NAME: &'static str = "FallingMarket";
    pub const PARAMETERS: &'static [ParameterSpec] = &[
        ParameterSpec {
            name: "search_range",
            label: "Search range",
            kind: ParamKind::Integer,
            default: 3.0,
        },
        ParameterSpec {
            name: "threshold_percentage",
            label: "Threshold (%)",
            kind: ParamKind::Number,
            default: 0.9,
        },
    ];

    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, DripfeedError> {
        Ok(Self {
            search_range: params.whole(&Self::PARAMETERS[0])?,
            threshold_percentage: params.positive(&Self::PARAMETERS[1])?,
        })
    }

    pub fn plan(&self, ctx: &PlanContext<'_>) -> ContributionPlan {
        let mut plan = ctx.opening_plan();
        if !ctx.has_regular_investment() {
            return plan;
        }

        let rows = ctx.snapped_schedule();
        let prices = ctx.series.prices();
        let dates = ctx.series.dates();
        let mut pool = 0.0;

        for k in self.search_range..rows.len() {
            let now = prices[rows[k]];
            let before = prices[rows[k - self.search_range]];
            if now < self.threshold_percentage * before {
                if pool > 0.0 {
                    plan.insert(dates[rows[k]], pool);
                    pool = 0.0;
                }
            } else {
                pool += ctx.investment.regular_investment;
            }
        }
        plan
    }
}
