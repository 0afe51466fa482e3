//! CLI integration tests for the run orchestration.
//!
//! Tests cover:
//! - Config decoding into run requests
//! - The run pipeline with MockPriceDataPort
//! - Full `run` / `validate` / `info` commands against INI and CSV files on disk

mod common;

use clap::Parser;
use common::*;
use dripfeed::adapters::csv_adapter::CsvPriceAdapter;
use dripfeed::adapters::file_config_adapter::FileConfigAdapter;
use dripfeed::cli::{self, Cli};
use dripfeed::domain::error::DripfeedError;
use dripfeed::ports::data_port::PriceDataPort;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn same_code(actual: ExitCode, expected: ExitCode) -> bool {
    format!("{actual:?}") == format!("{expected:?}")
}

fn write_prices(dir: &Path, ticker: &str, points: &[PricePoint]) {
    let mut csv = String::from("Date,Open,Close\n");
    for p in points {
        csv.push_str(&format!("{},{},{}\n", p.date, p.price, p.price + 1.0));
    }
    fs::write(dir.join(format!("{ticker}.csv")), csv).unwrap();
}

fn run_ini(directory: &Path, extra: &str) -> String {
    format!(
        r#"
[data]
directory = {}
ticker = ACME

[investment]
initial_investment = 1000
regular_investment = 100
frequency = weeks

[strategy]
names = InitialInvestment, RegularInvestment, BearDripFeed
number_down_periods = 2
{extra}
"#,
        directory.display()
    )
}

mod request_building {
    use super::*;

    #[test]
    fn names_and_parameters_flow_into_requests() {
        let adapter = FileConfigAdapter::from_string(&run_ini(Path::new("/data"), "")).unwrap();
        let requests = cli::build_requests(&adapter, &[], None).unwrap();

        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].strategy, "BearDripFeed");
        assert_eq!(requests[2].parameters.get("number_down_periods"), Some(2.0));
        assert_eq!(requests[0].investment.regular_investment, 100.0);
        assert_eq!(requests[0].start_date, None);
    }

    #[test]
    fn missing_strategy_is_config_missing() {
        let adapter = FileConfigAdapter::from_string("[data]\nticker = X\n").unwrap();
        let err = cli::build_requests(&adapter, &[], None).unwrap_err();
        assert!(matches!(err, DripfeedError::ConfigMissing { key, .. } if key == "name"));
    }
}

mod pipeline {
    use super::*;

    fn config() -> FileConfigAdapter {
        FileConfigAdapter::from_string(&run_ini(Path::new("/unused"), "")).unwrap()
    }

    #[test]
    fn runs_every_requested_strategy() {
        let config = config();
        let port = MockPriceDataPort::new()
            .with_prices("ACME", trading_days(date(2023, 1, 2), 260));
        let requests = cli::build_requests(&config, &[], None).unwrap();
        let reports = cli::run_pipeline(&config, &port, "ACME", &requests).unwrap();

        assert_eq!(reports.len(), 3);
        let lump = &reports[0].result.summary;
        let regular = &reports[1].result.summary;
        assert_eq!(lump.total_invested, 1000.0);
        assert!(regular.total_invested > 1000.0);

        let table = cli::comparison_table("ACME", &reports);
        assert!(table.contains("=== ACME ==="));
        assert!(table.contains("RegularInvestment"));
    }

    #[test]
    fn data_section_dates_filter_the_series() {
        let config = FileConfigAdapter::from_string(
            "[data]\nticker = ACME\nstart_date = 2023-03-01\nend_date = 2023-03-31\n",
        )
        .unwrap();
        let port = MockPriceDataPort::new()
            .with_prices("ACME", trading_days(date(2023, 1, 2), 260));
        let requests = cli::build_requests(&config, &["InitialInvestment".to_string()], None).unwrap();
        let reports = cli::run_pipeline(&config, &port, "ACME", &requests).unwrap();

        let s = &reports[0].result.summary;
        assert_eq!(s.start_date, date(2023, 3, 1));
        assert_eq!(s.end_date, date(2023, 3, 31));
        assert_eq!(reports[0].result.rows.len(), 23);
    }

    #[test]
    fn partial_failure_keeps_successful_reports() {
        let config = config();
        let port = MockPriceDataPort::new().with_prices("ACME", daily_points(date(2024, 1, 1), &FALLING));
        let requests = cli::build_requests(
            &config,
            &["InitialInvestment".to_string(), "Moonshot".to_string()],
            None,
        )
        .unwrap();
        let reports = cli::run_pipeline(&config, &port, "ACME", &requests).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].strategy, "InitialInvestment");
    }

    #[test]
    fn all_failures_return_first_error() {
        let config = config();
        let port = MockPriceDataPort::new().with_prices("ACME", daily_points(date(2024, 1, 1), &FALLING));
        let requests = cli::build_requests(&config, &["Moonshot".to_string()], None).unwrap();
        let err = cli::run_pipeline(&config, &port, "ACME", &requests).unwrap_err();
        assert!(matches!(err, DripfeedError::UnknownStrategy { .. }));
    }

    #[test]
    fn data_port_errors_propagate() {
        let config = config();
        let port = MockPriceDataPort::new().with_error("ACME", "disk on fire");
        let requests = cli::build_requests(&config, &[], None).unwrap();
        let err = cli::run_pipeline(&config, &port, "ACME", &requests).unwrap_err();
        assert!(matches!(err, DripfeedError::DataSource { .. }));

        let err = cli::run_pipeline(&config, &MockPriceDataPort::new(), "ACME", &requests).unwrap_err();
        assert!(matches!(err, DripfeedError::NoData { .. }));
    }
}

mod commands {
    use super::*;

    fn fixture(extra: &str) -> (TempDir, tempfile::NamedTempFile) {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "ACME", &trading_days(date(2023, 1, 2), 120));
        let ini = write_temp_ini(&run_ini(dir.path(), extra));
        (dir, ini)
    }

    fn run(args: &[&str]) -> ExitCode {
        cli::run(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn run_writes_json_report() {
        let (dir, ini) = fixture("");
        let out = dir.path().join("report.json");
        let code = run(&[
            "dripfeed",
            "run",
            "-c",
            ini.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]);
        assert!(same_code(code, ExitCode::SUCCESS));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        for name in ["InitialInvestment", "RegularInvestment", "BearDripFeed"] {
            assert!(json[name]["summary"]["value"].is_number(), "{name} missing");
        }
        assert_eq!(json["InitialInvestment"]["data"]["date"][0], "2023-01-02");
    }

    #[test]
    fn run_writes_csv_report_from_config() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("series.csv");
        write_prices(dir.path(), "ACME", &trading_days(date(2023, 1, 2), 60));
        let ini = write_temp_ini(&run_ini(
            dir.path(),
            &format!("\n[report]\noutput = {}\ndate_format = long\n", out.display()),
        ));

        let code = run(&[
            "dripfeed",
            "run",
            "-c",
            ini.path().to_str().unwrap(),
            "--strategy",
            "Velocity",
        ]);
        assert!(same_code(code, ExitCode::SUCCESS));

        let content = fs::read_to_string(&out).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("strategy,date,price"));
        assert!(lines.next().unwrap().starts_with("Velocity,2023-01-02 00:00:00 UTC,"));
        assert_eq!(content.lines().count(), 61);
    }

    #[test]
    fn price_column_selects_close() {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "ACME", &daily_points(date(2024, 1, 1), &FALLING));
        let config = FileConfigAdapter::from_string(&format!(
            "[data]\ndirectory = {}\nprice_column = close\n",
            dir.path().display()
        ))
        .unwrap();
        let port = cli::build_data_port(&config).unwrap();
        let requests = vec![dripfeed::domain::runner::RunRequest::new(
            "InitialInvestment",
            dripfeed::domain::investment::InvestmentParameters::new(
                1010.0,
                0.0,
                dripfeed::domain::schedule::Frequency::Months,
            ),
        )];
        let reports = cli::run_pipeline(&config, &port, "ACME", &requests).unwrap();
        // Close is open + 1: 1010 / 101 * 93
        assert_eq!(reports[0].result.summary.value, 930.0);
    }

    #[test]
    fn strategy_flag_runs_without_strategy_section() {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "ACME", &trading_days(date(2023, 1, 2), 40));
        let ini = write_temp_ini(&format!(
            "[data]\ndirectory = {}\nticker = ACME\n\n[investment]\ninitial_investment = 500\n",
            dir.path().display()
        ));
        let out = dir.path().join("lump.json");

        let code = run(&[
            "dripfeed",
            "run",
            "-c",
            ini.path().to_str().unwrap(),
            "--strategy",
            "InitialInvestment",
            "-o",
            out.to_str().unwrap(),
        ]);
        assert!(same_code(code, ExitCode::SUCCESS));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["InitialInvestment"]["summary"]["total_invested"], 500.0);
    }

    #[test]
    fn strategy_flag_overrides_stale_config_name() {
        let dir = TempDir::new().unwrap();
        write_prices(dir.path(), "ACME", &trading_days(date(2023, 1, 2), 40));
        let ini = write_temp_ini(&format!(
            "[data]\ndirectory = {}\nticker = ACME\n\n[strategy]\nnames = Moonshot\n",
            dir.path().display()
        ));
        let code = run(&[
            "dripfeed",
            "run",
            "-c",
            ini.path().to_str().unwrap(),
            "--strategy",
            "RegularInvestment",
        ]);
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn unknown_ticker_exits_with_no_data() {
        let (_dir, ini) = fixture("");
        let code = run(&[
            "dripfeed",
            "run",
            "-c",
            ini.path().to_str().unwrap(),
            "--ticker",
            "NOPE",
        ]);
        assert!(same_code(code, ExitCode::from(5)));
    }

    #[test]
    fn invalid_config_exits_with_config_code() {
        let (_dir, ini) = fixture("\n[report]\ndate_format = roman\n");
        let code = run(&["dripfeed", "validate", "-c", ini.path().to_str().unwrap()]);
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn validate_accepts_good_config() {
        let (_dir, ini) = fixture("");
        let code = run(&["dripfeed", "validate", "-c", ini.path().to_str().unwrap()]);
        assert!(same_code(code, ExitCode::SUCCESS));
    }

    #[test]
    fn missing_config_file_exits_with_config_code() {
        let code = run(&["dripfeed", "validate", "-c", "/nonexistent/dripfeed.ini"]);
        assert!(same_code(code, ExitCode::from(2)));
    }

    #[test]
    fn info_reports_range() {
        let (dir, ini) = fixture("");
        let code = run(&["dripfeed", "info", "-c", ini.path().to_str().unwrap()]);
        assert!(same_code(code, ExitCode::SUCCESS));

        let adapter = CsvPriceAdapter::new(dir.path().to_path_buf());
        let (first, _, count) = adapter.get_data_range("ACME").unwrap().unwrap();
        assert_eq!(first, date(2023, 1, 2));
        assert_eq!(count, 120);
    }

    #[test]
    fn list_strategies_succeeds() {
        assert!(same_code(run(&["dripfeed", "list-strategies"]), ExitCode::SUCCESS));
        assert!(same_code(
            run(&["dripfeed", "list-strategies", "--json"]),
            ExitCode::SUCCESS
        ));
    }
}
