//! dripfeed — dollar-cost-averaging strategy evaluator.
//!
//! Hexagonal architecture: the evaluation engine lives in [`domain`], port
//! traits in [`ports`], concrete file/report implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
