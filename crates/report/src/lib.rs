//! Reporting surface for cleaning runs.
//!
//! This crate provides:
//! - Discard ratio summaries as percentages
//! - Plain-text preview of the cleaned rows

pub mod preview;
pub mod summary;

pub use preview::render_preview;
pub use summary::{format_ratio, CleaningSummary};
