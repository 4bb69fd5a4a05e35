//! Quote batches
//!
//! Runs weight resolution and rate lookup for every quantity in a request.

use crate::error::{Error, Result};
use crate::rates::{MissingRate, RateTable};
use crate::weight::{resolve_weights, total_kg, BufferSchedule, ResolvedWeight};
use crate::zone::ShipmentZone;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Everything the user supplies for one quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteRequest {
    pub zone: ShipmentZone,
    /// Piece counts, ascending
    pub quantities: Vec<u32>,
    /// Weight of one piece in grams
    pub unit_grams: f64,
}

impl QuoteRequest {
    /// Build a request, sorting quantities ascending
    pub fn new(zone: ShipmentZone, mut quantities: Vec<u32>, unit_grams: f64) -> Result<Self> {
        if quantities.is_empty() {
            return Err(Error::Quantity {
                input: String::new(),
                reason: "at least one quantity is required".into(),
            });
        }
        if let Some(zero) = quantities.iter().find(|&&q| q == 0) {
            return Err(Error::Quantity {
                input: zero.to_string(),
                reason: "quantities must be positive".into(),
            });
        }
        if !unit_grams.is_finite() || unit_grams <= 0.0 {
            return Err(Error::UnitWeight {
                input: unit_grams.to_string(),
                reason: "must be a positive number of grams".into(),
            });
        }
        quantities.sort_unstable();
        if let Some(&heaviest) = quantities.last() {
            if !total_kg(unit_grams, heaviest).is_finite() {
                return Err(Error::UnitWeight {
                    input: unit_grams.to_string(),
                    reason: format!("{} pcs would weigh more than can be represented", heaviest),
                });
            }
        }
        Ok(Self {
            zone,
            quantities,
            unit_grams,
        })
    }
}

/// Priced result for one quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuoteResult {
    pub quantity: u32,
    pub raw_weight: f64,
    pub buffered_weight: f64,
    pub raw_cost: f64,
    pub buffered_cost: f64,
}

/// Prices quote requests against one rate table
#[derive(Debug, Clone)]
pub struct Quoter<'a> {
    table: &'a RateTable,
    buffer: BufferSchedule,
    missing: MissingRate,
}

impl<'a> Quoter<'a> {
    pub fn new(table: &'a RateTable) -> Self {
        Self {
            table,
            buffer: BufferSchedule::default(),
            missing: MissingRate::default(),
        }
    }

    pub fn with_buffer(mut self, buffer: BufferSchedule) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_missing_rate(mut self, missing: MissingRate) -> Self {
        self.missing = missing;
        self
    }

    /// Raw and buffered weights for a request, in quantity order
    pub fn weights(&self, request: &QuoteRequest) -> Vec<ResolvedWeight> {
        resolve_weights(&request.quantities, request.unit_grams, &self.buffer)
    }

    /// Price already-resolved weights
    pub fn price(&self, zone: ShipmentZone, weights: &[ResolvedWeight]) -> Result<Vec<QuoteResult>> {
        let raw_costs = weights
            .iter()
            .map(|w| self.finite_cost(w.raw, zone))
            .collect::<Result<Vec<_>>>()?;
        let buffered_costs = weights
            .iter()
            .map(|w| self.finite_cost(w.buffered, zone))
            .collect::<Result<Vec<_>>>()?;

        Ok(weights
            .iter()
            .zip(raw_costs.into_iter().zip(buffered_costs))
            .map(|(w, (raw_cost, buffered_cost))| QuoteResult {
                quantity: w.quantity,
                raw_weight: w.raw,
                buffered_weight: w.buffered,
                raw_cost,
                buffered_cost,
            })
            .collect())
    }

    fn finite_cost(&self, weight: f64, zone: ShipmentZone) -> Result<f64> {
        let cost = self.table.cost_with(weight, zone, self.missing)?;
        if !cost.is_finite() {
            return Err(Error::Other(format!(
                "cost of {} kg from {} is not a finite amount",
                weight, zone
            )));
        }
        Ok(cost)
    }

    pub fn quote(&self, request: &QuoteRequest) -> Result<Vec<QuoteResult>> {
        let weights = self.weights(request);
        let results = self.price(request.zone, &weights)?;
        tracing::info!(
            zone = %request.zone,
            entries = results.len(),
            unit_grams = request.unit_grams,
            "quote computed"
        );
        Ok(results)
    }
}
