//! Classic dollar-cost averaging: initial lump sum, then a fixed amount on
//! every schedule date.

use crate::domain::error::DripfeedError;
use crate::domain::strategy::{ContributionPlan, ParameterSpec, PlanContext, StrategyParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegularInvestment;

impl RegularInvestment {
    pub const NAME: &'static str = "RegularInvestment";
    pub const PARAMETERS: &'static [ParameterSpec] = &[];

    pub fn from_parameters(_params: &StrategyParameters) -> Result<Self, DripfeedError> {
        Ok(Self)
    }

    pub fn plan(&self, ctx: &PlanContext<'_>) -> ContributionPlan {
        let mut plan = ctx.opening_plan();
        if ctx.has_regular_investment() {
            for date in ctx.regular_schedule() {
                plan.insert(date, ctx.investment.regular_investment);
            }
        }
        plan
    }
}
