// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # freightcalc — freight cost estimator
//!
//! Prices a batch of package quantities against a carrier rate sheet.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                                                               │
//! │  session   zone, quantities, unit weight ──► QuoteRequest     │
//! │     │                                                         │
//! │  weight    grams × qty / 1000 ──► round up ½ kg ──► + cushion │
//! │     │                                                         │
//! │  rates     ≤ 70 kg: exact break row                           │
//! │            > 70 kg: weight × per-kg band rate                 │
//! │     │                                                         │
//! │  report    console rows, optional saved table                 │
//! │                                                               │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use freightcalc::{QuoteRequest, Quoter, RateTable, ShipmentZone};
//!
//! let table = RateTable::load("rates.yaml".as_ref())?;
//! let request = QuoteRequest::new(ShipmentZone::China, vec![50, 10], 200.0)?;
//! for result in Quoter::new(&table).quote(&request)? {
//!     println!("{} pcs: ${:.2}", result.quantity, result.buffered_cost);
//! }
//! ```

pub mod config;
pub mod error;
pub mod quote;
pub mod rates;
pub mod report;
pub mod session;
pub mod weight;
pub mod zone;

// Re-exports
pub use config::{FreightConfig, ReportConfig};
pub use error::{Error, Result};
pub use quote::{QuoteRequest, QuoteResult, Quoter};
pub use rates::{Band, MissingRate, PerKgBands, RateTable, WeightBreak, ZoneRates};
pub use report::{Report, ReportFormat};
pub use session::{run_session, Outcome, Prompter};
pub use weight::{add_buffer, round_weight, BufferSchedule, ResolvedWeight};
pub use zone::ShipmentZone;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
