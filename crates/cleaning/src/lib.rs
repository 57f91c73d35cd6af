//! Cleaning pipeline for manufacturing run metrics.
//!
//! This crate provides:
//! - Resolution of the fixed metric columns
//! - Numeric coercion with explicit missing markers
//! - The three-step filter cascade
//! - Before/after totals and discard ratios

pub mod aggregate;
pub mod coerce;
pub mod filter;
pub mod pipeline;
pub mod schema;

pub use aggregate::{DiscardRatios, Totals};
pub use coerce::{ParseWarning, ParsedRecord};
pub use filter::{FilterStage, FilterStats};
pub use pipeline::{clean, CleanedRecord, CleaningResult};
pub use schema::{Passthrough, Schema};
