//! Console and file reports

use crate::error::{Error, Result};
use crate::quote::QuoteResult;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::Path;

/// Width of the banner and closing rule
pub const RULE_WIDTH: usize = 32;

/// Column the cost is right-aligned to, counted after the quantity
pub const COST_COLUMN: usize = 25;

/// Header row of the saved table
pub const TABLE_HEADER: &str = "Quantity | Raw Cost | Buffered Cost";

/// One console row: `<quantity> pcs: $<cost>`, cost right-aligned
pub fn cost_line(quantity: u32, cost: f64) -> String {
    let qty = quantity.to_string();
    let width = COST_COLUMN.saturating_sub(qty.len());
    format!("{} pcs: ${:>width$}", qty, format!("{:.2}", cost), width = width)
}

/// Print the raw and buffered weight lists shown before pricing
pub fn write_weights<W: Write>(out: &mut W, results: &[QuoteResult]) -> io::Result<()> {
    let raw: Vec<f64> = results.iter().map(|r| r.raw_weight).collect();
    let buffered: Vec<f64> = results.iter().map(|r| r.buffered_weight).collect();
    writeln!(out, "Raw Weight: {:?}", raw)?;
    writeln!(out, "Buffered Weight: {:?}\n", buffered)
}

/// Print the cost report
pub fn write_console<W: Write>(out: &mut W, results: &[QuoteResult]) -> io::Result<()> {
    writeln!(out, "{:-^width$}", "Report Complete", width = RULE_WIDTH)?;
    writeln!(out, "Raw Cost:")?;
    for r in results {
        writeln!(out, "{}", cost_line(r.quantity, r.raw_cost))?;
    }
    writeln!(out, "\nBuffered Cost:")?;
    for r in results {
        writeln!(out, "{}", cost_line(r.quantity, r.buffered_cost))?;
    }
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))
}

/// File format of the saved report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Pipe-delimited text table
    #[default]
    Table,
    Json,
}

/// One row of the saved report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportRow {
    pub quantity: u32,
    pub raw_cost: f64,
    pub buffered_cost: f64,
}

/// Saved freight estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Freight Estimate", description = "Saved quote report")]
pub struct Report {
    pub title: String,
    #[schemars(with = "String")]
    pub date: NaiveDate,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn new(title: impl Into<String>, date: NaiveDate, results: &[QuoteResult]) -> Self {
        Self {
            title: title.into(),
            date,
            rows: results
                .iter()
                .map(|r| ReportRow {
                    quantity: r.quantity,
                    raw_cost: r.raw_cost,
                    buffered_cost: r.buffered_cost,
                })
                .collect(),
        }
    }

    /// Title, date, a blank line, the header, then one line per row
    pub fn to_table(&self) -> String {
        let mut lines = vec![
            self.title.clone(),
            self.date.format("%m/%d/%Y").to_string(),
            String::new(),
            TABLE_HEADER.to_string(),
        ];
        lines.extend(self.rows.iter().map(|row| {
            format!(
                "{} | {:.2} | {:.2}",
                row.quantity, row.raw_cost, row.buffered_cost
            )
        }));
        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Table => Ok(self.to_table()),
            ReportFormat::Json => {
                let mut json = serde_json::to_string_pretty(self)?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Write the report to `path`. The parent directory must already exist.
    pub fn save(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let content = self.render(format)?;
        std::fs::write(path, content).map_err(Error::Io)?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "report saved");
        Ok(())
    }
}
