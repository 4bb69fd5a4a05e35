//! freightcalc CLI - Command-line interface
//!
//! Commands:
//!   quote    - Interactive freight quote (default)
//!   rates    - Validate and summarise a rate table
//!   schema   - Print JSON schema for a file format

use freightcalc::config::RATES_ENV;
use freightcalc::rates::RateTableSummary;
use freightcalc::*;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    let result = match args.get(1).map(String::as_str) {
        None => cmd_quote(&[]),
        Some(flag) if flag.starts_with("--") && !is_help_or_version(flag) => {
            cmd_quote(&args[1..])
        }
        Some("quote") => cmd_quote(&args[2..]),
        Some("rates") => cmd_rates(&args[2..]),
        Some("schema") => cmd_schema(&args[2..]),
        Some("version" | "--version" | "-v") => {
            println!("freightcalc {}", VERSION);
            Ok(())
        }
        Some("help" | "--help" | "-h") => {
            print_usage();
            Ok(())
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn is_help_or_version(flag: &str) -> bool {
    matches!(flag, "--help" | "--version")
}

/// Diagnostics go to stderr so prompts on stdout stay readable
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_usage() {
    println!(
        r#"
freightcalc - Freight cost estimator

USAGE:
    freightcalc [COMMAND] [OPTIONS]

COMMANDS:
    quote                            Run an interactive quote (default)
    rates <rates.yaml> [--json]      Validate and summarise a rate table
    schema [config|rates|report]     Print JSON schema for a file format
    version                          Print version

OPTIONS (quote):
    --config <file>                  Config file (default: ./freightcalc.yaml if present)
    --rates <file>                   Rate table (overrides config and FREIGHTCALC_RATES)
    --output-dir <dir>               Directory for the saved report (default: ~/Desktop)

ENVIRONMENT:
    FREIGHTCALC_RATES                Rate table path when --rates is not given
    RUST_LOG                         Log filter, e.g. RUST_LOG=freightcalc=debug

EXAMPLES:
    freightcalc --rates rates/2019_import_rates.yaml
    freightcalc quote --config freightcalc.yaml --output-dir ./quotes
    freightcalc rates rates/2019_import_rates.yaml --json
"#
    );
}

/// Parse a `--flag <path>` argument. A flag without a value is a usage error.
fn parse_path_arg(args: &[String], flag: &str) -> Result<Option<PathBuf>> {
    let Some(i) = args.iter().position(|arg| arg == flag) else {
        return Ok(None);
    };
    match args.get(i + 1) {
        Some(value) if !value.starts_with("--") => Ok(Some(PathBuf::from(value))),
        _ => Err(format!("Usage: {} requires a value", flag).into()),
    }
}

fn cmd_quote(args: &[String]) -> Result<()> {
    let rates = parse_path_arg(args, "--rates")?;
    let output_dir = parse_path_arg(args, "--output-dir")?;
    let mut config = match parse_path_arg(args, "--config")? {
        Some(path) => FreightConfig::load(&path)?,
        None => {
            let cwd = std::env::current_dir().map_err(Error::Io)?;
            FreightConfig::discover(&cwd)?
        }
    };
    config.apply_overrides(
        rates,
        std::env::var_os(RATES_ENV).map(PathBuf::from),
        output_dir,
    );

    let table = RateTable::load(config.rates_path()?)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter = Prompter::new(stdin.lock(), stdout.lock());
    let today = chrono::Local::now().date_naive();

    match run_session(&mut prompter, &table, &config, today)? {
        Outcome::Quit => tracing::debug!("quit at zone prompt"),
        Outcome::Declined => tracing::debug!("report declined"),
        Outcome::Saved(path) => tracing::debug!(path = %path.display(), "session complete"),
    }
    Ok(())
}

fn cmd_rates(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        return Err("Usage: freightcalc rates <rates.yaml> [--json]".into());
    };
    let json_output = args.contains(&"--json".to_string());

    let table = RateTable::load(Path::new(path))?;
    let summary: RateTableSummary = table.summary();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", summary.to_report());
        println!("✓ Rate table is valid");
    }
    Ok(())
}

fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: config, rates, report");
            Ok(())
        }
        "config" => print_schema::<FreightConfig>(),
        "rates" => print_schema::<RateTable>(),
        "report" => print_schema::<Report>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
