//! Table ingestion and emission for the runclean system.
//!
//! This crate handles:
//! - Locale-aware number parsing (comma decimals, percent suffixes)
//! - Number rendering for display and output
//! - Reading the raw export (leading line skip, missing tokens)
//! - Writing the cleaned table (semicolon fields, comma decimals)

pub mod locale;
pub mod reader;
pub mod writer;

pub use locale::{format_number, format_number_with_decimal, parse_locale_number, parse_percent};
pub use reader::TableReader;
pub use writer::TableWriter;
