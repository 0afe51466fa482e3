//! Drip-feed into a bear market: contribute on a schedule date only after
//! the preceding `number_down_periods` schedule steps never rose.

use crate::domain::error::DripfeedError;
use crate::domain::strategy::{
    ContributionPlan, ParamKind, ParameterSpec, PlanContext, StrategyParameters,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearDripFeed {
    pub number_down_periods: usize,
}

impl BearDripFeed {
    pub const NAME: &'static str = "BearDripFeed";
    pub const PARAMETERS: &'static [ParameterSpec] = &[ParameterSpec {
        name: "number_down_periods",
        label: "Down periods",
        kind: ParamKind::Integer,
        default: 3.0,
    }];

    pub fn from_parameters(params: &StrategyParameters) -> Result<Self, DripfeedError> {
        Ok(Self {
            number_down_periods: params.whole(&Self::PARAMETERS[0])?,
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
        let n = self.number_down_periods;

        for k in n..rows.len() {
            let falling = rows[k - n..=k]
                .windows(2)
                .all(|w| prices[w[0]] >= prices[w[1]]);
            if falling {
                plan.insert(dates[rows[k]], ctx.investment.regular_investment);
            }
        }
        plan
    }
}
