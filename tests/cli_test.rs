//! Tests for the freightcalc binary: exit codes, rates/schema output and
//! rate table path precedence

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn get_freightcalc_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_freightcalc"))
}

fn fixture_rates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/rates.yaml")
}

/// Run the binary in `dir` with a clean environment and `stdin` piped in
fn run_freightcalc(dir: &Path, args: &[&str], envs: &[(&str, &Path)], stdin: &str) -> Output {
    let mut command = Command::new(get_freightcalc_binary());
    command
        .args(args)
        .current_dir(dir)
        .env_remove("FREIGHTCALC_RATES")
        .env_remove("RUST_LOG")
        .env("HOME", dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        command.env(key, value);
    }

    let mut child = command.spawn().expect("Failed to execute freightcalc");
    // the binary may exit on a usage error before reading any input
    let _ = child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes());
    child.wait_with_output().expect("Failed to wait for freightcalc")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_rates_json_summary() {
    let temp = TempDir::new().unwrap();
    let rates = fixture_rates();
    let output = run_freightcalc(
        temp.path(),
        &["rates", rates.to_str().unwrap(), "--json"],
        &[],
        "",
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let summary: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(summary["sheet"], "US Import Rates");
    assert_eq!(summary["break_rows"], 140);
    assert_eq!(summary["lightest_break"], 0.5);
    assert_eq!(summary["heaviest_break"], 70.0);
    assert_eq!(summary["bands"]["above_999"]["thailand"], 3.5);
}

#[test]
fn test_rates_text_summary() {
    let temp = TempDir::new().unwrap();
    let rates = fixture_rates();
    let output = run_freightcalc(temp.path(), &["rates", rates.to_str().unwrap()], &[], "");

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Sheet: US Import Rates"));
    assert!(stdout.contains("✓ Rate table is valid"));
}

#[test]
fn test_rates_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let output = run_freightcalc(temp.path(), &["rates", "missing.yaml"], &[], "");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: "));
}

#[test]
fn test_schema_commands() {
    let temp = TempDir::new().unwrap();
    for (name, field) in [("rates", "breaks"), ("config", "missing_rate"), ("report", "rows")] {
        let output = run_freightcalc(temp.path(), &["schema", name], &[], "");
        assert!(output.status.success(), "schema {} failed", name);
        let schema: serde_json::Value = serde_json::from_str(&stdout_of(&output))
            .unwrap_or_else(|e| panic!("schema {} is not JSON: {}", name, e));
        assert!(
            schema["properties"].get(field).is_some(),
            "schema {} lacks {}",
            name,
            field
        );
    }

    let unknown = run_freightcalc(temp.path(), &["schema", "nonsense"], &[], "");
    assert_eq!(unknown.status.code(), Some(1));
    assert!(stderr_of(&unknown).contains("Error: Unknown schema: nonsense"));
}

#[test]
fn test_quit_exits_zero() {
    let temp = TempDir::new().unwrap();
    let rates = fixture_rates();
    let output = run_freightcalc(
        temp.path(),
        &["--rates", rates.to_str().unwrap()],
        &[],
        "q\n",
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none());
}

#[test]
fn test_malformed_quantity_exits_one() {
    let temp = TempDir::new().unwrap();
    let rates = fixture_rates();
    let output = run_freightcalc(
        temp.path(),
        &["quote", "--rates", rates.to_str().unwrap()],
        &[],
        "1\n10 ten\n",
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: Invalid quantity 'ten'"));
}

#[test]
fn test_malformed_weight_exits_one() {
    let temp = TempDir::new().unwrap();
    let rates = fixture_rates();
    let output = run_freightcalc(
        temp.path(),
        &["quote", "--rates", rates.to_str().unwrap()],
        &[],
        "2\n10\nheavy\n",
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: Invalid unit weight 'heavy'"));
}

#[test]
fn test_rates_flag_overrides_environment() {
    let temp = TempDir::new().unwrap();
    let rates = fixture_rates();
    let missing = temp.path().join("missing.yaml");
    let output = run_freightcalc(
        temp.path(),
        &["--rates", rates.to_str().unwrap(), "--output-dir", temp.path().to_str().unwrap()],
        &[("FREIGHTCALC_RATES", &missing)],
        "1\n50 10\n200\nn\n",
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Raw Weight: [2.0, 10.0]"));
    assert!(stdout.contains("Closing..."));
}

#[test]
fn test_environment_overrides_config_file() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("freightcalc.yaml"),
        "rates: missing.yaml\nreport:\n  filename: quote.txt\n",
    )
    .unwrap();
    let rates = fixture_rates();
    let output = run_freightcalc(
        temp.path(),
        &["--output-dir", temp.path().to_str().unwrap()],
        &[("FREIGHTCALC_RATES", &rates)],
        "1\n10\n200\ny\n",
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let saved = fs::read_to_string(temp.path().join("quote.txt")).unwrap();
    assert!(saved.contains("Quantity | Raw Cost | Buffered Cost"));
    assert!(saved.contains("10 | 40.00 | 45.00"));
}

#[test]
fn test_config_file_rates_used_without_overrides() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("freightcalc.yaml"), "rates: missing.yaml\n").unwrap();
    let output = run_freightcalc(temp.path(), &[], &[], "q\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: IO error"));
}

#[test]
fn test_no_rate_table_configured() {
    let temp = TempDir::new().unwrap();
    let output = run_freightcalc(temp.path(), &["quote"], &[], "q\n");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Error: Config error: no rate table configured"));
}

#[test]
fn test_flag_without_value_is_usage_error() {
    let temp = TempDir::new().unwrap();
    for args in [
        &["quote", "--rates"][..],
        &["--config"][..],
        &["--rates", "--output-dir", "out"][..],
    ] {
        let output = run_freightcalc(temp.path(), args, &[], "q\n");
        assert_eq!(output.status.code(), Some(1), "args {:?}", args);
        assert!(
            stderr_of(&output).contains("requires a value"),
            "args {:?}: {}",
            args,
            stderr_of(&output)
        );
    }
}
