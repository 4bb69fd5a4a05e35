//! Shipment origin zones
//!
//! Each zone selects one price column of the rate sheet. The column numbers
//! are the 1-based sheet columns the carrier's import rate sheet uses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin zone of a shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentZone {
    /// China (carrier zone G)
    China,
    /// Taiwan or Hong Kong (carrier zone H)
    TaiwanHongKong,
    /// Thailand (carrier zone I)
    Thailand,
}

/// Outcome of reading one answer to the zone prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneChoice {
    Zone(ShipmentZone),
    Quit,
    /// Not a number and not the quit sentinel
    NotANumber,
    /// A number outside 1..=3
    OutOfRange(i64),
}

impl ShipmentZone {
    pub const ALL: [ShipmentZone; 3] = [
        ShipmentZone::China,
        ShipmentZone::TaiwanHongKong,
        ShipmentZone::Thailand,
    ];

    /// Sheet column holding this zone's prices
    pub fn column(self) -> usize {
        match self {
            ShipmentZone::China => 9,
            ShipmentZone::TaiwanHongKong => 10,
            ShipmentZone::Thailand => 11,
        }
    }

    /// Menu key shown in the zone prompt
    pub fn selector(self) -> u8 {
        match self {
            ShipmentZone::China => 1,
            ShipmentZone::TaiwanHongKong => 2,
            ShipmentZone::Thailand => 3,
        }
    }

    pub fn from_selector(key: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|z| i64::from(z.selector()) == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            ShipmentZone::China => "China",
            ShipmentZone::TaiwanHongKong => "Taiwan or Hong Kong",
            ShipmentZone::Thailand => "Thailand",
        }
    }
}

impl fmt::Display for ShipmentZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (column {})", self.label(), self.column())
    }
}

impl ZoneChoice {
    /// Interpret one line typed at the zone prompt
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input == "q" {
            return ZoneChoice::Quit;
        }
        match input.parse::<i64>() {
            Ok(key) => match ShipmentZone::from_selector(key) {
                Some(zone) => ZoneChoice::Zone(zone),
                None => ZoneChoice::OutOfRange(key),
            },
            Err(_) => ZoneChoice::NotANumber,
        }
    }
}
