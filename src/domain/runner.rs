//! Run one or more named strategies against a price series.

use crate::domain::error::DripfeedError;
use crate::domain::evaluator::{EvaluationResult, evaluate};
use crate::domain::investment::{InvestmentParameters, InvestmentSummary};
use crate::domain::price_series::PriceSeries;
use crate::domain::strategy::registry;
use crate::domain::strategy::{PlanContext, StrategyParameters};
use crate::domain::window::{StrategyWindow, WindowDiagnostic};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

pub use crate::domain::strategy::registry::list_strategies;

#[derive(Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub strategy: String,
    pub investment: InvestmentParameters,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub parameters: StrategyParameters,
}

impl RunRequest {
    pub fn new(strategy: impl Into<String>, investment: InvestmentParameters) -> Self {
        Self {
            strategy: strategy.into(),
            investment,
            start_date: None,
            end_date: None,
            parameters: StrategyParameters::new(),
        }
    }

    pub fn with_window(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_parameters(mut self, parameters: StrategyParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyReport {
    pub strategy: String,
    pub investment: InvestmentSummary,
    pub window: StrategyWindow,
    pub diagnostics: Vec<WindowDiagnostic>,
    pub result: EvaluationResult,
}

pub fn run_strategy(
    request: &RunRequest,
    series: &PriceSeries,
) -> Result<StrategyReport, DripfeedError> {
    let entry = registry::lookup(&request.strategy)?;
    let strategy = entry.build(&request.parameters)?;

    if series.is_empty() {
        return Err(DripfeedError::InvalidSeries {
            reason: "price series has no rows".into(),
        });
    }

    let (window, diagnostics) =
        StrategyWindow::resolve(series, request.start_date, request.end_date)?;
    debug!(
        strategy = entry.name,
        start = %window.start_date,
        end = %window.end_date,
        "resolved window"
    );

    let ctx = PlanContext::new(series, &request.investment, window);
    let run = strategy.compute_plan(&ctx);
    info!(
        strategy = entry.name,
        contributions = run.plan.len(),
        total = run.plan.total(),
        "plan computed"
    );

    let result = evaluate(series, &run.plan, &window, run.signals.as_ref())?;

    Ok(StrategyReport {
        strategy: entry.name.to_string(),
        investment: request.investment.summary(),
        window,
        diagnostics,
        result,
    })
}

/// Every request runs on the same series. A failing strategy does not stop
/// the others.
pub fn run_comparison(
    requests: &[RunRequest],
    series: &PriceSeries,
) -> Vec<(String, Result<StrategyReport, DripfeedError>)> {
    requests
        .iter()
        .map(|request| {
            let outcome = run_strategy(request, series);
            if let Err(e) = &outcome {
                warn!(strategy = %request.strategy, "strategy failed: {e}");
            }
            (request.strategy.clone(), outcome)
        })
        .collect()
}
