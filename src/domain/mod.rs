//! Core domain types and logic.

pub mod config_validation;
pub mod encoding;
pub mod error;
pub mod evaluator;
pub mod investment;
pub mod nearest_date;
pub mod price_series;
pub mod runner;
pub mod schedule;
pub mod signal;
pub mod strategy;
pub mod window;
