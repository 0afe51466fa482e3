//! End-to-end tests of the evaluation engine: registry lookup, window
//! resolution, plan computation, evaluation and encoding.

mod common;

use approx::assert_relative_eq;
use common::*;
use dripfeed::domain::encoding::{DateFormat, encode_report};
use dripfeed::domain::error::DripfeedError;
use dripfeed::domain::evaluator::evaluate;
use dripfeed::domain::investment::InvestmentParameters;
use dripfeed::domain::runner::{RunRequest, list_strategies, run_comparison, run_strategy};
use dripfeed::domain::schedule::{Frequency, build_schedule, frequency_to_interval};
use dripfeed::domain::strategy::registry::build_strategy;
use dripfeed::domain::strategy::{PlanContext, StrategyParameters};
use dripfeed::domain::window::{StrategyWindow, WindowDiagnostic};

fn investment(initial: f64, regular: f64, frequency: Frequency) -> InvestmentParameters {
    InvestmentParameters::new(initial, regular, frequency)
}

mod scenarios {
    use super::*;

    #[test]
    fn lump_sum_into_ten_falling_days() {
        let series = daily_series(date(2024, 1, 1), &FALLING);
        let request = RunRequest::new("InitialInvestment", investment(1000.0, 0.0, Frequency::Months));
        let report = run_strategy(&request, &series).unwrap();

        let s = &report.result.summary;
        assert_eq!(s.start_date, date(2024, 1, 1));
        assert_eq!(s.end_date, date(2024, 1, 10));
        assert_eq!(s.total_invested, 1000.0);
        assert_relative_eq!(s.value, 920.0);
        assert_relative_eq!(s.returns, -80.0);
        assert_relative_eq!(s.percentage_returns, -8.0);

        let contributions: Vec<_> = report
            .result
            .rows
            .iter()
            .filter(|r| r.investment != 0.0)
            .collect();
        assert_eq!(contributions.len(), 1);
        assert_eq!(contributions[0].date, date(2024, 1, 1));
    }

    #[test]
    fn regular_investment_counts_schedule_steps() {
        let series = daily_series(date(2024, 1, 1), &[50.0; 60]);
        let inv = investment(300.0, 25.0, Frequency::Weeks);
        let window = StrategyWindow::new(date(2024, 1, 1), date(2024, 2, 29));
        let strategy = build_strategy("RegularInvestment", &StrategyParameters::new()).unwrap();
        let run = strategy.compute_plan(&PlanContext::new(&series, &inv, window));

        let steps = build_schedule(window.start_date, window.end_date, frequency_to_interval("weeks"), true);
        assert_eq!(run.plan.len(), 1 + steps.len());
        for d in &steps {
            assert_eq!(run.plan.get(*d), Some(25.0));
        }

        let result = evaluate(&series, &run.plan, &window, None).unwrap();
        assert_relative_eq!(result.summary.total_invested, 300.0 + 25.0 * steps.len() as f64);
        assert_relative_eq!(result.summary.returns, 0.0);
    }

    #[test]
    fn bear_drip_feed_on_strictly_falling_series() {
        let prices: Vec<f64> = (0..10).map(|i| 200.0 - 5.0 * i as f64).collect();
        let series = daily_series(date(2024, 3, 1), &prices);
        let request = RunRequest::new("BearDripFeed", investment(0.0, 10.0, Frequency::Days))
            .with_parameters(StrategyParameters::new().with("number_down_periods", 2.0));
        let report = run_strategy(&request, &series).unwrap();

        let invested: Vec<f64> = report.result.rows.iter().map(|r| r.investment).collect();
        // Schedule points are rows 1..=9; the third is row 3.
        assert_eq!(&invested[..3], &[0.0, 0.0, 0.0]);
        assert!(invested[3..].iter().all(|&a| a == 10.0));
    }

    #[test]
    fn weekend_schedule_dates_snap_onto_trading_days() {
        let series = PriceSeries::new(trading_days(date(2024, 1, 1), 120)).unwrap();
        let request = RunRequest::new("RegularInvestment", investment(1000.0, 100.0, Frequency::Months));
        let report = run_strategy(&request, &series).unwrap();

        // 2024-06-01 is a Saturday; its contribution lands on Friday 2024-05-31.
        let row = report.result.row_at(date(2024, 5, 31)).unwrap();
        assert_eq!(row.investment, 100.0);
        assert_relative_eq!(
            report.result.rows.iter().map(|r| r.investment).sum::<f64>(),
            report.result.summary.total_invested
        );
    }

    #[test]
    fn random_investment_is_reproducible_with_seed() {
        let series = daily_series(date(2024, 1, 1), &[10.0; 90]);
        let inv = investment(100.0, 10.0, Frequency::Weeks);
        let params = StrategyParameters::new().with("seed", 42.0).with("randomness", 0.5);
        let request = RunRequest::new("RandomInvestment", inv).with_parameters(params);

        let a = run_strategy(&request, &series).unwrap();
        let b = run_strategy(&request, &series).unwrap();
        assert_eq!(a.result, b.result);
        assert!(a.result.summary.total_invested >= 100.0);
        assert!(a.result.summary.total_invested <= 100.0 + 12.0 * 10.0);
    }
}

mod windows {
    use super::*;

    #[test]
    fn inverted_and_out_of_range_bounds_are_reported() {
        let series = daily_series(date(2024, 1, 1), &FALLING);
        let request = RunRequest::new("InitialInvestment", investment(100.0, 0.0, Frequency::Days))
            .with_window(Some(date(2025, 1, 1)), Some(date(2023, 1, 1)));
        let report = run_strategy(&request, &series).unwrap();

        assert_eq!(report.window, StrategyWindow::new(date(2024, 1, 1), date(2024, 1, 10)));
        assert!(matches!(report.diagnostics[0], WindowDiagnostic::Swapped { .. }));
        assert!(matches!(report.diagnostics[1], WindowDiagnostic::StartClamped { .. }));
        assert!(matches!(report.diagnostics[2], WindowDiagnostic::EndClamped { .. }));
    }

    #[test]
    fn start_date_snaps_forward() {
        let series = PriceSeries::new(trading_days(date(2024, 1, 1), 30)).unwrap();
        let request = RunRequest::new("InitialInvestment", investment(100.0, 0.0, Frequency::Days))
            .with_window(Some(date(2024, 1, 6)), None);
        let report = run_strategy(&request, &series).unwrap();
        assert_eq!(report.result.summary.start_date, date(2024, 1, 8));
        assert!(report.diagnostics.is_empty());
    }
}

mod comparison {
    use super::*;

    #[test]
    fn every_strategy_on_one_series() {
        let series = PriceSeries::new(trading_days(date(2022, 1, 3), 400)).unwrap();
        let inv = investment(1000.0, 100.0, Frequency::Weeks);
        let requests: Vec<RunRequest> = list_strategies()
            .keys()
            .map(|name| {
                RunRequest::new(*name, inv.clone())
                    .with_parameters(StrategyParameters::new().with("seed", 1.0))
            })
            .collect();

        let outcomes = run_comparison(&requests, &series);
        assert_eq!(outcomes.len(), 7);
        for (name, outcome) in outcomes {
            let report = outcome.unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(report.strategy, name);
            assert!(report.result.summary.total_invested >= 1000.0);
            encode_report(&report, DateFormat::Short)
                .unwrap_or_else(|e| panic!("{name} did not encode: {e}"));
        }
    }

    #[test]
    fn signal_strategies_attach_their_columns() {
        let series = PriceSeries::new(trading_days(date(2022, 1, 3), 200)).unwrap();
        let inv = investment(1000.0, 100.0, Frequency::Weeks);

        let velocity = run_strategy(&RunRequest::new("Velocity", inv.clone()), &series).unwrap();
        let doc = encode_report(&velocity, DateFormat::Short).unwrap();
        assert!(doc.data.velocity.is_some());
        assert!(doc.data.power.is_none());

        let velocity_max = run_strategy(&RunRequest::new("VelocityMax", inv), &series).unwrap();
        let doc = encode_report(&velocity_max, DateFormat::Short).unwrap();
        assert!(doc.data.acceleration.is_some());
        assert!(doc.data.power.is_some());
    }

    #[test]
    fn unknown_name_does_not_block_others() {
        let series = daily_series(date(2024, 1, 1), &FALLING);
        let inv = investment(100.0, 0.0, Frequency::Days);
        let outcomes = run_comparison(
            &[
                RunRequest::new("Lottery", inv.clone()),
                RunRequest::new("InitialInvestment", inv),
            ],
            &series,
        );
        assert!(matches!(outcomes[0].1, Err(DripfeedError::UnknownStrategy { .. })));
        assert!(outcomes[1].1.is_ok());
    }

    #[test]
    fn series_is_unchanged_by_evaluation() {
        let series = daily_series(date(2024, 1, 1), &FALLING);
        let before = series.clone();
        let inv = investment(100.0, 10.0, Frequency::Days);
        for name in ["Velocity", "VelocityMax", "FallingMarket"] {
            run_strategy(&RunRequest::new(name, inv.clone()), &series).unwrap();
        }
        assert_eq!(series, before);
    }
}

mod discovery {
    use super::*;

    #[test]
    fn listing_exposes_all_descriptors() {
        let listing = list_strategies();
        let names: Vec<_> = listing.keys().copied().collect();
        assert_eq!(
            names,
            vec![
                "BearDripFeed",
                "FallingMarket",
                "InitialInvestment",
                "RandomInvestment",
                "RegularInvestment",
                "Velocity",
                "VelocityMax",
            ]
        );

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["BearDripFeed"][0]["name"], "number_down_periods");
        assert_eq!(json["BearDripFeed"][0]["type"], "integer");
        assert_eq!(json["VelocityMax"][1]["default"], 0.01);
        assert_eq!(json["RandomInvestment"][0]["name"], "randomness");
        assert!(json["RegularInvestment"].as_array().unwrap().is_empty());
    }
}
