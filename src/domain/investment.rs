//! Investment amounts and cadence shared by every strategy.

use crate::domain::schedule::Frequency;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentParameters {
    pub initial_investment: f64,
    pub regular_investment: f64,
    pub regular_investment_frequency: Frequency,
    pub allow_overdrawn: bool,
}

impl InvestmentParameters {
    pub fn new(initial_investment: f64, regular_investment: f64, frequency: Frequency) -> Self {
        Self {
            initial_investment,
            regular_investment,
            regular_investment_frequency: frequency,
            allow_overdrawn: false,
        }
    }

    pub fn summary(&self) -> InvestmentSummary {
        InvestmentSummary {
            initial_investment: self.initial_investment,
            regular_investment: self.regular_investment,
            regular_investment_frequency: self.regular_investment_frequency.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentSummary {
    pub initial_investment: f64,
    pub regular_investment: f64,
    pub regular_investment_frequency: String,
}
