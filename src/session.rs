//! Interactive quote session
//!
//! [`Prompter`] asks the questions, [`run_session`] walks one quote from
//! zone selection to the optional saved report. Both work on any
//! `BufRead`/`Write` pair so they run the same against a terminal or a test
//! buffer.

use crate::config::FreightConfig;
use crate::error::{Error, Result};
use crate::quote::{QuoteRequest, Quoter};
use crate::rates::RateTable;
use crate::report::{write_console, write_weights, Report};
use crate::zone::{ShipmentZone, ZoneChoice};
use chrono::NaiveDate;
use std::io::{BufRead, Write};
use std::path::PathBuf;

const ZONE_PROMPT: &str = "\nWhat country will this shipment be coming from?\n\n\
Type 'q' to quit\n\
Press 1 for China\n\
Press 2 for Taiwan or Hong Kong\n\
Press 3 for Thailand\n\
Country: ";

const QUANTITY_PROMPT: &str =
    "\nEnter the quantities you would like to quote, separated by a space:\n";

const WEIGHT_PROMPT: &str = "\nEnter the weight of 1pc (in grams):\n";

const REPORT_PROMPT: &str = "\nWould you like to generate a report of this data?\n\
Press 'y' to save a report, otherwise press any key to exit.\n";

/// Parse a space-separated list of positive quantities, sorted ascending
pub fn parse_quantities(line: &str) -> Result<Vec<u32>> {
    let mut quantities = line
        .split_whitespace()
        .map(|token| {
            let qty: u32 = token.parse().map_err(|e| Error::Quantity {
                input: token.to_string(),
                reason: format!("{}", e),
            })?;
            if qty == 0 {
                return Err(Error::Quantity {
                    input: token.to_string(),
                    reason: "quantities must be positive".into(),
                });
            }
            Ok(qty)
        })
        .collect::<Result<Vec<_>>>()?;

    if quantities.is_empty() {
        return Err(Error::Quantity {
            input: line.trim().to_string(),
            reason: "at least one quantity is required".into(),
        });
    }
    quantities.sort_unstable();
    Ok(quantities)
}

/// Parse the weight of one piece in grams
pub fn parse_unit_weight(line: &str) -> Result<f64> {
    let input = line.trim();
    let grams: f64 = input.parse().map_err(|e| Error::UnitWeight {
        input: input.to_string(),
        reason: format!("{}", e),
    })?;
    if !grams.is_finite() || grams <= 0.0 {
        return Err(Error::UnitWeight {
            input: input.to_string(),
            reason: "must be a positive number of grams".into(),
        });
    }
    Ok(grams)
}

/// Console question-and-answer over a reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    /// Ask until a zone or the quit sentinel is entered. `None` means quit.
    pub fn select_zone(&mut self) -> Result<Option<ShipmentZone>> {
        loop {
            let line = self
                .ask(ZONE_PROMPT)?
                .ok_or(Error::UnexpectedEof("a zone selection"))?;
            match ZoneChoice::parse(&line) {
                ZoneChoice::Zone(zone) => return Ok(Some(zone)),
                ZoneChoice::Quit => return Ok(None),
                ZoneChoice::NotANumber => {
                    writeln!(self.output, "\nPlease enter a valid character")?;
                }
                ZoneChoice::OutOfRange(key) => {
                    tracing::debug!(key, "zone selector out of range");
                    writeln!(self.output, "\nPlease enter 1, 2, or 3")?;
                }
            }
        }
    }

    pub fn read_quantities(&mut self) -> Result<Vec<u32>> {
        let line = self
            .ask(QUANTITY_PROMPT)?
            .ok_or(Error::UnexpectedEof("quantities"))?;
        parse_quantities(&line)
    }

    pub fn read_unit_weight(&mut self) -> Result<f64> {
        let line = self
            .ask(WEIGHT_PROMPT)?
            .ok_or(Error::UnexpectedEof("the unit weight"))?;
        parse_unit_weight(&line)
    }

    /// `true` only when the answer is exactly `y`; end of input declines
    pub fn confirm_report(&mut self) -> Result<bool> {
        Ok(self
            .ask(REPORT_PROMPT)?
            .is_some_and(|answer| answer.trim() == "y"))
    }

    /// Zone, quantities and unit weight as one request. `None` means quit.
    pub fn collect_request(&mut self) -> Result<Option<QuoteRequest>> {
        let Some(zone) = self.select_zone()? else {
            return Ok(None);
        };
        let quantities = self.read_quantities()?;
        let unit_grams = self.read_unit_weight()?;
        QuoteRequest::new(zone, quantities, unit_grams).map(Some)
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user quit at the zone prompt
    Quit,
    /// Quote shown, report declined
    Declined,
    /// Quote shown and report written to this path
    Saved(PathBuf),
}

/// Run one interactive quote
pub fn run_session<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    table: &RateTable,
    config: &FreightConfig,
    today: NaiveDate,
) -> Result<Outcome> {
    let Some(request) = prompter.collect_request()? else {
        return Ok(Outcome::Quit);
    };

    let quoter = Quoter::new(table)
        .with_buffer(config.buffer_schedule())
        .with_missing_rate(config.missing_rate);

    writeln!(prompter.output(), "\nProcessing Quote\n")?;
    let results = quoter.quote(&request)?;
    write_weights(prompter.output(), &results)?;
    write_console(prompter.output(), &results)?;

    if !prompter.confirm_report()? {
        writeln!(prompter.output(), "\nClosing...")?;
        return Ok(Outcome::Declined);
    }

    let path = config.report.output_path()?;
    writeln!(prompter.output(), "\nSaving a report to {}", path.display())?;
    Report::new(config.report.title.clone(), today, &results).save(&path, config.report.format)?;
    Ok(Outcome::Saved(path))
}
