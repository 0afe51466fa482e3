//! Name-based strategy lookup.
//!
//! The registry is a fixed table built at compile time: each entry pairs a
//! public name and parameter descriptor with a constructor. Dispatch is a
//! table lookup.

use crate::domain::error::DripfeedError;
use crate::domain::strategy::{
    BearDripFeed, FallingMarket, InitialInvestment, ParameterSpec, RandomInvestment,
    RegularInvestment, Strategy, StrategyParameters, Velocity, VelocityMax,
};
use std::collections::BTreeMap;

type Constructor = fn(&StrategyParameters) -> Result<Strategy, DripfeedError>;

pub struct RegistryEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterSpec],
    build: Constructor,
}

impl RegistryEntry {
    pub fn build(&self, params: &StrategyParameters) -> Result<Strategy, DripfeedError> {
        (self.build)(params)
    }
}

fn build_initial(p: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    InitialInvestment::from_parameters(p).map(Strategy::InitialInvestment)
}

fn build_regular(p: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    RegularInvestment::from_parameters(p).map(Strategy::RegularInvestment)
}

fn build_random(p: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    RandomInvestment::from_parameters(p).map(Strategy::RandomInvestment)
}

fn build_bear_drip_feed(p: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    BearDripFeed::from_parameters(p).map(Strategy::BearDripFeed)
}

fn build_falling_market(p: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    FallingMarket::from_parameters(p).map(Strategy::FallingMarket)
}

fn build_velocity(p: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    Velocity::from_parameters(p).map(Strategy::Velocity)
}

fn build_velocity_max(p: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    VelocityMax::from_parameters(p).map(Strategy::VelocityMax)
}

static REGISTRY: [RegistryEntry; 7] = [
    RegistryEntry {
        name: InitialInvestment::NAME,
        description: "One single investment at the start date",
        parameters: InitialInvestment::PARAMETERS,
        build: build_initial,
    },
    RegistryEntry {
        name: RegularInvestment::NAME,
        description: "A series of regular investments",
        parameters: RegularInvestment::PARAMETERS,
        build: build_regular,
    },
    RegistryEntry {
        name: RandomInvestment::NAME,
        description: "A series of regular but random investments",
        parameters: RandomInvestment::PARAMETERS,
        build: build_random,
    },
    RegistryEntry {
        name: BearDripFeed::NAME,
        description: "Invest after the market has fallen for several consecutive periods",
        parameters: BearDripFeed::PARAMETERS,
        build: build_bear_drip_feed,
    },
    RegistryEntry {
        name: FallingMarket::NAME,
        description: "Save up and invest when the market falls below a threshold",
        parameters: FallingMarket::PARAMETERS,
        build: build_falling_market,
    },
    RegistryEntry {
        name: Velocity::NAME,
        description: "Invest more the faster the market is falling",
        parameters: Velocity::PARAMETERS,
        build: build_velocity,
    },
    RegistryEntry {
        name: VelocityMax::NAME,
        description: "Invest as a fast fall turns, taking drag into account",
        parameters: VelocityMax::PARAMETERS,
        build: build_velocity_max,
    },
];

pub fn entries() -> &'static [RegistryEntry] {
    &REGISTRY
}

pub fn lookup(name: &str) -> Result<&'static RegistryEntry, DripfeedError> {
    REGISTRY
        .iter()
        .find(|e| e.name == name)
        .ok_or_else(|| DripfeedError::UnknownStrategy {
            name: name.to_string(),
        })
}

pub fn build_strategy(name: &str, params: &StrategyParameters) -> Result<Strategy, DripfeedError> {
    lookup(name)?.build(params)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|e| e.name)
}

/// Strategy name → extra parameter descriptors.
pub fn list_strategies() -> BTreeMap<&'static str, &'static [ParameterSpec]> {
    REGISTRY.iter().map(|e| (e.name, e.parameters)).collect()
}
