//! Lump sum: the whole initial investment on the window start.

use crate::domain::error::DripfeedError;
use crate::domain::strategy::{ContributionPlan, ParameterSpec, PlanContext, StrategyParameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitialInvestment;

impl InitialInvestment {
    pub const NAME: &'static str = "InitialInvestment";
    pub const PARAMETERS: &'static [ParameterSpec] = &[];

    pub fn from_parameters(_params: &StrategyParameters) -> Result<Self, DripfeedError> {
        Ok(Self)
    }

    pub fn plan(&self, ctx: &PlanContext<'_>) -> ContributionPlan {
        ctx.opening_plan()
    }
}
