//! Rate table and cost lookup
//!
//! Prices come from the carrier's import rate sheet, kept as YAML:
//!
//! ```yaml
//! sheet: US Import Rates
//! breaks:
//!   - { weight: 0.5, china: 41.10, taiwan_hong_kong: 43.25, thailand: 47.80 }
//!   - { weight: 1.0, china: 48.35, taiwan_hong_kong: 50.10, thailand: 55.60 }
//!   # ... every half kilogram up to 70
//! bands:
//!   up_to_150: { china: 7.95, taiwan_hong_kong: 8.40, thailand: 9.15 }
//!   up_to_300: { china: 7.60, taiwan_hong_kong: 8.05, thailand: 8.80 }
//!   up_to_999: { china: 7.25, taiwan_hong_kong: 7.70, thailand: 8.45 }
//!   above_999: { china: 6.90, taiwan_hong_kong: 7.35, thailand: 8.10 }
//! ```
//!
//! Weights up to [`DISCRETE_LIMIT`] are priced by exact match against a
//! break row. Heavier weights are priced per kilogram by band.

use crate::error::{Error, Result};
use crate::zone::ShipmentZone;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

/// Heaviest weight priced from the discrete break rows
pub const DISCRETE_LIMIT: f64 = 70.0;

/// One price per zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ZoneRates {
    pub china: f64,
    pub taiwan_hong_kong: f64,
    pub thailand: f64,
}

impl ZoneRates {
    pub fn get(&self, zone: ShipmentZone) -> f64 {
        match zone {
            ShipmentZone::China => self.china,
            ShipmentZone::TaiwanHongKong => self.taiwan_hong_kong,
            ShipmentZone::Thailand => self.thailand,
        }
    }

    fn check(&self, what: &str) -> Result<()> {
        for zone in ShipmentZone::ALL {
            let price = self.get(zone);
            if !price.is_finite() || price < 0.0 {
                return Err(Error::RateTable(format!(
                    "{} has invalid price {} for {}",
                    what,
                    price,
                    zone.label()
                )));
            }
        }
        Ok(())
    }
}

/// A discrete weight break row: flat prices for exactly `weight` kg
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeightBreak {
    pub weight: f64,
    #[serde(flatten)]
    pub rates: ZoneRates,
}

/// Per-kilogram multipliers above [`DISCRETE_LIMIT`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PerKgBands {
    pub up_to_150: ZoneRates,
    pub up_to_300: ZoneRates,
    pub up_to_999: ZoneRates,
    pub above_999: ZoneRates,
}

/// Weight band above the discrete region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    UpTo150,
    UpTo300,
    UpTo999,
    Above999,
}

impl Band {
    /// Band for a weight, or `None` inside the discrete region
    pub fn for_weight(weight: f64) -> Option<Self> {
        if weight <= DISCRETE_LIMIT {
            None
        } else if weight <= 150.0 {
            Some(Band::UpTo150)
        } else if weight <= 300.0 {
            Some(Band::UpTo300)
        } else if weight <= 999.0 {
            Some(Band::UpTo999)
        } else {
            Some(Band::Above999)
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::UpTo150 => "70-150 kg",
            Band::UpTo300 => "150-300 kg",
            Band::UpTo999 => "300-999 kg",
            Band::Above999 => "over 999 kg",
        }
    }
}

impl PerKgBands {
    pub fn rates(&self, band: Band) -> &ZoneRates {
        match band {
            Band::UpTo150 => &self.up_to_150,
            Band::UpTo300 => &self.up_to_300,
            Band::UpTo999 => &self.up_to_999,
            Band::Above999 => &self.above_999,
        }
    }
}

/// What to do when a weight in the discrete region has no break row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MissingRate {
    /// Fail with [`Error::RateNotFound`]
    #[default]
    Error,
    /// Legacy behavior: report the weight itself as the cost
    Passthrough,
}

/// The carrier rate sheet. Loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Rate Table", description = "Carrier import rate sheet")]
pub struct RateTable {
    /// Name of the source sheet
    #[serde(default = "default_sheet")]
    pub sheet: String,

    /// Discrete break rows for weights up to 70 kg
    pub breaks: Vec<WeightBreak>,

    /// Per-kg multipliers above 70 kg
    pub bands: PerKgBands,
}

fn default_sheet() -> String {
    "US Import Rates".to_string()
}

impl RateTable {
    /// Parse and validate a rate table from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let table: RateTable = serde_norway::from_str(yaml)
            .map_err(|e| Error::RateTable(format!("failed to parse rate table: {}", e)))?;
        table.validate()?;
        Ok(table)
    }

    /// Load a rate table file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        let table = Self::from_yaml(&content)?;
        tracing::debug!(
            path = %path.display(),
            sheet = %table.sheet,
            breaks = table.breaks.len(),
            "rate table loaded"
        );
        Ok(table)
    }

    pub fn validate(&self) -> Result<()> {
        if self.breaks.is_empty() {
            return Err(Error::RateTable("no weight break rows".into()));
        }

        let mut seen = HashSet::new();
        for row in &self.breaks {
            if !row.weight.is_finite() || row.weight <= 0.0 || row.weight > DISCRETE_LIMIT {
                return Err(Error::RateTable(format!(
                    "break weight {} must be in (0, {}]",
                    row.weight, DISCRETE_LIMIT
                )));
            }
            if !seen.insert(row.weight.to_bits()) {
                return Err(Error::RateTable(format!(
                    "duplicate break weight {}",
                    row.weight
                )));
            }
            row.rates.check(&format!("break {} kg", row.weight))?;
        }

        for band in [Band::UpTo150, Band::UpTo300, Band::UpTo999, Band::Above999] {
            self.bands
                .rates(band)
                .check(&format!("band {}", band.label()))?;
        }
        Ok(())
    }

    /// Flat price of the break row matching `weight` exactly
    pub fn break_rate(&self, weight: f64, zone: ShipmentZone) -> Option<f64> {
        self.breaks
            .iter()
            .find(|row| row.weight == weight)
            .map(|row| row.rates.get(zone))
    }

    /// Cost of shipping `weight` kg from `zone`, failing on a missing break row
    pub fn cost(&self, weight: f64, zone: ShipmentZone) -> Result<f64> {
        self.cost_with(weight, zone, MissingRate::Error)
    }

    /// Cost of shipping `weight` kg from `zone` under the given miss policy
    pub fn cost_with(&self, weight: f64, zone: ShipmentZone, missing: MissingRate) -> Result<f64> {
        match Band::for_weight(weight) {
            Some(band) => Ok(weight * self.bands.rates(band).get(zone)),
            None => match (self.break_rate(weight, zone), missing) {
                (Some(price), _) => Ok(price),
                (None, MissingRate::Error) => Err(Error::RateNotFound { weight, zone }),
                (None, MissingRate::Passthrough) => {
                    tracing::warn!(
                        weight,
                        zone = %zone,
                        "no break row for weight, passing weight through as cost"
                    );
                    Ok(weight)
                }
            },
        }
    }

    pub fn summary(&self) -> RateTableSummary {
        let weights = self.breaks.iter().map(|row| row.weight);
        RateTableSummary {
            sheet: self.sheet.clone(),
            break_rows: self.breaks.len(),
            lightest_break: weights.clone().fold(f64::INFINITY, f64::min),
            heaviest_break: weights.fold(f64::NEG_INFINITY, f64::max),
            bands: self.bands,
        }
    }
}

/// Overview of a loaded rate table
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RateTableSummary {
    pub sheet: String,
    pub break_rows: usize,
    pub lightest_break: f64,
    pub heaviest_break: f64,
    pub bands: PerKgBands,
}

impl RateTableSummary {
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Sheet: {}", self.sheet);
        let _ = writeln!(
            out,
            "Break rows: {} ({} - {} kg)",
            self.break_rows, self.lightest_break, self.heaviest_break
        );
        let _ = writeln!(out, "Per-kg bands:");
        for band in [Band::UpTo150, Band::UpTo300, Band::UpTo999, Band::Above999] {
            let rates = self.bands.rates(band);
            let _ = writeln!(
                out,
                "  {:<12} China {:>8.2}  Taiwan/HK {:>8.2}  Thailand {:>8.2}",
                band.label(),
                rates.china,
                rates.taiwan_hong_kong,
                rates.thailand
            );
        }
        out
    }
}
