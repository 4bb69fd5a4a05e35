//! Error types for freightcalc

use crate::zone::ShipmentZone;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// freightcalc errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid quantity '{input}': {reason}")]
    Quantity { input: String, reason: String },

    #[error("Invalid unit weight '{input}': {reason}")]
    UnitWeight { input: String, reason: String },

    #[error("Input ended while waiting for {0}")]
    UnexpectedEof(&'static str),

    #[error("Rate table error: {0}")]
    RateTable(String),

    #[error("No rate found for {weight} kg in zone {zone}")]
    RateNotFound { weight: f64, zone: ShipmentZone },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
