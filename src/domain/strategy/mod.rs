//! Contribution strategies.
//!
//! A strategy turns a price series, the investment parameters and a resolved
//! window into a [`ContributionPlan`]. The set of strategies is closed: each
//! variant of [`Strategy`] wraps its own resolved parameters, and the
//! [`registry`] maps public names to constructors and parameter descriptors.

pub mod bear_drip_feed;
pub mod falling_market;
pub mod initial;
pub mod random;
pub mod registry;
pub mod regular;
pub mod velocity;
pub mod velocity_max;

pub use bear_drip_feed::BearDripFeed;
pub use falling_market::FallingMarket;
pub use initial::InitialInvestment;
pub use random::RandomInvestment;
pub use regular::RegularInvestment;
pub use velocity::Velocity;
pub use velocity_max::VelocityMax;

use crate::domain::error::DripfeedError;
use crate::domain::investment::InvestmentParameters;
use crate::domain::nearest_date::nearest_past;
use crate::domain::price_series::PriceSeries;
use crate::domain::schedule::build_schedule;
use crate::domain::signal::KinematicSignals;
use crate::domain::window::StrategyWindow;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Integer,
    Number,
}

/// Describes one extra parameter a strategy accepts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub default: f64,
}

/// Caller-supplied extra parameters, keyed by descriptor name. Keys a
/// strategy does not know are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyParameters {
    values: BTreeMap<String, f64>,
}

impl StrategyParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// The supplied value, or the descriptor default. Must be finite.
    pub fn number(&self, spec: &ParameterSpec) -> Result<f64, DripfeedError> {
        let value = self.get(spec.name).unwrap_or(spec.default);
        if !value.is_finite() {
            return Err(DripfeedError::invalid_parameter(spec.name, "must be finite"));
        }
        Ok(value)
    }

    pub fn whole(&self, spec: &ParameterSpec) -> Result<usize, DripfeedError> {
        let value = self.number(spec)?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(DripfeedError::invalid_parameter(
                spec.name,
                format!("must be a non-negative whole number, got {value}"),
            ));
        }
        Ok(value as usize)
    }

    pub fn positive(&self, spec: &ParameterSpec) -> Result<f64, DripfeedError> {
        let value = self.number(spec)?;
        if value <= 0.0 {
            return Err(DripfeedError::invalid_parameter(
                spec.name,
                format!("must be positive, got {value}"),
            ));
        }
        Ok(value)
    }
}

/// Dated contributions. Writing the same date twice keeps the later amount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContributionPlan {
    entries: BTreeMap<NaiveDate, f64>,
}

impl ContributionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, amount: f64) {
        self.entries.insert(date, amount);
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.entries.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.entries.iter().map(|(d, a)| (*d, *a))
    }
}

impl FromIterator<(NaiveDate, f64)> for ContributionPlan {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Everything a strategy reads while planning.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub series: &'a PriceSeries,
    pub investment: &'a InvestmentParameters,
    pub window: StrategyWindow,
}

impl<'a> PlanContext<'a> {
    pub fn new(
        series: &'a PriceSeries,
        investment: &'a InvestmentParameters,
        window: StrategyWindow,
    ) -> Self {
        Self {
            series,
            investment,
            window,
        }
    }

    /// The initial contribution on the window start.
    pub fn opening_plan(&self) -> ContributionPlan {
        let mut plan = ContributionPlan::new();
        plan.insert(self.window.start_date, self.investment.initial_investment);
        plan
    }

    /// Regular contribution dates after the window start, not snapped.
    pub fn regular_schedule(&self) -> Vec<NaiveDate> {
        build_schedule(
            self.window.start_date,
            self.window.end_date,
            self.investment.regular_investment_frequency.interval(),
            true,
        )
    }

    /// Regular contribution dates snapped back onto series rows, as row indices.
    pub fn snapped_schedule(&self) -> Vec<usize> {
        let dates = self.series.dates();
        self.regular_schedule()
            .into_iter()
            .filter_map(|d| nearest_past(dates, d))
            .filter_map(|d| self.series.index_of(d))
            .collect()
    }

    pub fn has_regular_investment(&self) -> bool {
        self.investment.regular_investment != 0.0
    }
}

/// A computed plan plus any signals derived while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRun {
    pub plan: ContributionPlan,
    pub signals: Option<KinematicSignals>,
}

impl From<ContributionPlan> for StrategyRun {
    fn from(plan: ContributionPlan) -> Self {
        Self {
            plan,
            signals: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    InitialInvestment(InitialInvestment),
    RegularInvestment(RegularInvestment),
    RandomInvestment(RandomInvestment),
    BearDripFeed(BearDripFeed),
    FallingMarket(FallingMarket),
    Velocity(Velocity),
    VelocityMax(VelocityMax),
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::InitialInvestment(_) => InitialInvestment::NAME,
            Strategy::RegularInvestment(_) => RegularInvestment::NAME,
            Strategy::RandomInvestment(_) => RandomInvestment::NAME,
            Strategy::BearDripFeed(_) => BearDripFeed::NAME,
            Strategy::FallingMarket(_) => FallingMarket::NAME,
            Strategy::Velocity(_) => Velocity::NAME,
            Strategy::VelocityMax(_) => VelocityMax::NAME,
        }
    }

    pub fn parameters(&self) -> &'static [ParameterSpec] {
        match self {
            Strategy::InitialInvestment(_) => InitialInvestment::PARAMETERS,
            Strategy::RegularInvestment(_) => RegularInvestment::PARAMETERS,
            Strategy::RandomInvestment(_) => RandomInvestment::PARAMETERS,
            Strategy::BearDripFeed(_) => BearDripFeed::PARAMETERS,
            Strategy::FallingMarket(_) => FallingMarket::PARAMETERS,
            Strategy::Velocity(_) => Velocity::PARAMETERS,
            Strategy::VelocityMax(_) => VelocityMax::PARAMETERS,
        }
    }

    pub fn compute_plan(&self, ctx: &PlanContext<'_>) -> StrategyRun {
        match self {
            Strategy::InitialInvestment(s) => s.plan(ctx).into(),
            Strategy::RegularInvestment(s) => s.plan(ctx).into(),
            Strategy::RandomInvestment(s) => s.plan(ctx).into(),
            Strategy::BearDripFeed(s) => s.plan(ctx).into(),
            Strategy::FallingMarket(s) => s.plan(ctx).into(),
            Strategy::Velocity(s) => s.plan(ctx),
            Strategy::VelocityMax(s) => s.plan(ctx),
        }
    }
}
