//! Weight resolution
//!
//! Turns a unit weight and a batch of quantities into shipment weights:
//!
//! 1. `grams × quantity / 1000` gives kilograms
//! 2. [`round_weight`] rounds up to the next half kilogram
//! 3. [`BufferSchedule::apply`] adds a cushion picked by weight bracket
//!
//! The rounded weight is the *raw* weight; the cushioned one is the
//! *buffered* weight. Both are priced independently.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Round a weight up to the next half unit.
///
/// A whole number is returned unchanged, a fractional part below one half
/// becomes one half, and anything from one half up becomes a whole unit.
///
/// ```
/// use freightcalc::weight::round_weight;
/// assert_eq!(round_weight(2.0), 2.0);
/// assert_eq!(round_weight(2.3), 2.5);
/// assert_eq!(round_weight(2.5), 3.0);
/// ```
pub fn round_weight(weight: f64) -> f64 {
    let whole = weight.floor();
    let frac = weight - whole;
    let step = if frac == 0.0 {
        0.0
    } else if frac < 0.5 {
        0.5
    } else {
        1.0
    };
    whole + step
}

/// Add the default cushion to a rounded weight.
///
/// ```
/// use freightcalc::weight::add_buffer;
/// assert_eq!(add_buffer(5.0), 6.0);
/// assert_eq!(add_buffer(501.0), 541.0);
/// ```
pub fn add_buffer(weight: f64) -> f64 {
    BufferSchedule::default().apply(weight)
}

/// One bracket of the cushion schedule: weights up to and including
/// `up_to` get `add` kilograms added.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CushionStep {
    pub up_to: f64,
    pub add: f64,
}

/// Ascending weight brackets with the cushion each one adds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BufferSchedule {
    /// Brackets, strictly ascending by `up_to`
    pub steps: Vec<CushionStep>,

    /// Cushion for weights above the last bracket
    pub beyond: f64,
}

impl Default for BufferSchedule {
    fn default() -> Self {
        let steps = [
            (5.0, 1.0),
            (10.0, 2.0),
            (25.0, 2.5),
            (50.0, 5.0),
            (75.0, 8.0),
            (100.0, 12.0),
            (150.0, 17.0),
            (200.0, 20.0),
            (500.0, 35.0),
        ]
        .into_iter()
        .map(|(up_to, add)| CushionStep { up_to, add })
        .collect();

        Self {
            steps,
            beyond: 40.0,
        }
    }
}

impl BufferSchedule {
    /// Cushion for a weight: the first bracket whose bound is >= `weight`
    pub fn cushion_for(&self, weight: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| weight <= step.up_to)
            .map_or(self.beyond, |step| step.add)
    }

    pub fn apply(&self, weight: f64) -> f64 {
        weight + self.cushion_for(weight)
    }

    /// Check that bounds ascend and cushions are usable.
    ///
    /// Cushions must also not shrink from one bracket to the next, otherwise
    /// a heavier parcel could end up with a lighter buffered weight.
    pub fn validate(&self) -> Result<()> {
        let mut prev: Option<&CushionStep> = None;
        for step in &self.steps {
            if !step.up_to.is_finite() || !step.add.is_finite() || step.add < 0.0 {
                return Err(Error::Config(format!(
                    "buffer step up_to={} add={} must be finite and non-negative",
                    step.up_to, step.add
                )));
            }
            if let Some(prev) = prev {
                if step.up_to <= prev.up_to {
                    return Err(Error::Config(format!(
                        "buffer bounds must ascend: {} follows {}",
                        step.up_to, prev.up_to
                    )));
                }
                if step.add < prev.add {
                    return Err(Error::Config(format!(
                        "buffer cushion {} at {} is smaller than {} at {}",
                        step.add, step.up_to, prev.add, prev.up_to
                    )));
                }
            }
            prev = Some(step);
        }
        if !self.beyond.is_finite()
            || self.beyond < 0.0
            || prev.is_some_and(|p| self.beyond < p.add)
        {
            return Err(Error::Config(format!(
                "buffer cushion beyond the last bound ({}) must be finite, non-negative and at least the last step",
                self.beyond
            )));
        }
        Ok(())
    }
}

/// Shipment weights for one quantity entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolvedWeight {
    pub quantity: u32,
    /// Rounded weight in kg
    pub raw: f64,
    /// Rounded weight plus cushion, in kg
    pub buffered: f64,
}

/// Kilograms for `quantity` pieces of `unit_grams` each
pub fn total_kg(unit_grams: f64, quantity: u32) -> f64 {
    unit_grams * f64::from(quantity) / 1000.0
}

/// Resolve raw and buffered weights for every quantity, keeping input order
pub fn resolve_weights(
    quantities: &[u32],
    unit_grams: f64,
    schedule: &BufferSchedule,
) -> Vec<ResolvedWeight> {
    quantities
        .iter()
        .map(|&quantity| {
            let raw = round_weight(total_kg(unit_grams, quantity));
            ResolvedWeight {
                quantity,
                raw,
                buffered: schedule.apply(raw),
            }
        })
        .collect()
}
