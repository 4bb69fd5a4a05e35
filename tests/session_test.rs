//! End-to-end tests for the interactive quote session

use chrono::NaiveDate;
use freightcalc::config::{FreightConfig, ReportConfig};
use freightcalc::rates::RateTable;
use freightcalc::report::ReportFormat;
use freightcalc::session::{run_session, Outcome, Prompter};
use freightcalc::Error;
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn load_rates() -> RateTable {
    let path = PathBuf::from("tests/fixtures/rates.yaml");
    RateTable::load(&path).expect("Failed to load rate fixture")
}

fn config_for(dir: &Path, format: ReportFormat) -> FreightConfig {
    FreightConfig {
        report: ReportConfig {
            directory: Some(dir.to_path_buf()),
            format,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 7, 3).unwrap()
}

fn run(input: &str, config: &FreightConfig) -> (freightcalc::Result<Outcome>, String) {
    let table = load_rates();
    let mut prompter = Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    let outcome = run_session(&mut prompter, &table, config, today());
    let (_, output) = prompter.into_inner();
    (outcome, String::from_utf8(output).unwrap())
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[test]
fn test_china_two_quantities_declined() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path(), ReportFormat::Table);

    let (outcome, output) = run("1\n50 10\n200\nn\n", &config);

    assert_eq!(outcome.unwrap(), Outcome::Declined);
    assert!(output.contains("Processing Quote"));
    assert!(output.contains("Raw Weight: [2.0, 10.0]"));
    assert!(output.contains("Buffered Weight: [3.0, 12.0]"));
    // 30 + 5w in the China column
    assert!(output.contains(&format!("10 pcs: ${:>23}", "40.00")));
    assert!(output.contains(&format!("50 pcs: ${:>23}", "80.00")));
    assert!(output.contains(&format!("10 pcs: ${:>23}", "45.00")));
    assert!(output.contains(&format!("50 pcs: ${:>23}", "90.00")));
    assert!(output.contains("Closing..."));
    assert!(files_in(temp.path()).is_empty());
}

#[test]
fn test_confirmed_report_writes_one_table() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path(), ReportFormat::Table);

    let (outcome, _) = run("3\n5 1 10\n250\ny\n", &config);

    let path = temp.path().join("freight_estimate.txt");
    assert_eq!(outcome.unwrap(), Outcome::Saved(path.clone()));
    assert_eq!(files_in(temp.path()), vec![path.clone()]);

    // 1, 5, 10 pcs at 250 g: 0.25 -> 0.5, 1.25 -> 1.5, 2.5 -> 3 kg raw
    // buffered: 1.5, 2.5, 4 kg. Thailand column is 35 + 6w.
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Freight Estimate\n07/03/2019\n\nQuantity | Raw Cost | Buffered Cost\n\
         1 | 38.00 | 44.00\n\
         5 | 44.00 | 50.00\n\
         10 | 53.00 | 59.00\n"
    );
    assert_eq!(content.lines().count(), 3 + 4);
}

#[test]
fn test_confirmed_report_as_json() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path(), ReportFormat::Json);

    let (outcome, _) = run("2\n4\n500\ny\n", &config);
    assert!(matches!(outcome, Ok(Outcome::Saved(_))));

    let content = fs::read_to_string(temp.path().join("freight_estimate.txt")).unwrap();
    let report: freightcalc::Report = serde_json::from_str(&content).unwrap();
    assert_eq!(report.rows.len(), 1);
    assert_eq!(report.rows[0].quantity, 4);
    // 2 kg raw, 3 kg buffered; Taiwan/HK column is 32 + 5.5w
    assert_eq!(report.rows[0].raw_cost, 43.0);
    assert_eq!(report.rows[0].buffered_cost, 48.5);
}

#[test]
fn test_quit_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path(), ReportFormat::Table);

    let (outcome, output) = run("x\nq\n", &config);
    assert_eq!(outcome.unwrap(), Outcome::Quit);
    assert!(output.contains("Please enter a valid character"));
    assert!(!output.contains("Processing Quote"));
    assert!(files_in(temp.path()).is_empty());
}

#[test]
fn test_malformed_weight_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path(), ReportFormat::Table);

    let (outcome, _) = run("1\n10\ntwo hundred\ny\n", &config);
    assert!(matches!(outcome, Err(Error::UnitWeight { .. })));
}

#[test]
fn test_heavy_shipment_priced_by_band() {
    let temp = TempDir::new().unwrap();
    let config = config_for(temp.path(), ReportFormat::Json);

    // 400 pcs * 500 g = 200 kg raw, 220 kg buffered, both in the 150-300 band
    let (outcome, _) = run("1\n400\n500\ny\n", &config);
    assert!(outcome.is_ok());

    let content = fs::read_to_string(temp.path().join("freight_estimate.txt")).unwrap();
    let report: freightcalc::Report = serde_json::from_str(&content).unwrap();
    assert_eq!(report.rows[0].raw_cost, 200.0 * 3.5);
    assert_eq!(report.rows[0].buffered_cost, 220.0 * 3.5);
}

#[test]
fn test_missing_output_directory_is_io_error() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp.path().join("missing"), ReportFormat::Table);

    let (outcome, _) = run("1\n10\n200\ny\n", &config);
    assert!(matches!(outcome, Err(Error::Io(_))));
}
