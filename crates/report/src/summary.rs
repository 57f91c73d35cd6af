//! Discard summary.
//!
//! Condenses a [`CleaningResult`] into the three user-facing ratios plus the
//! row counts behind them.

use runclean_cleaning::{CleaningResult, FilterStats};
use runclean_core::{Ratio, Result};
use serde::Serialize;
use std::fmt;

/// Text shown for an undefined ratio.
pub const UNDEFINED_RATIO: &str = "N/A";

/// Format a ratio as a percentage, e.g. `12.34%`.
pub fn format_ratio(ratio: Ratio, decimals: usize) -> String {
    match ratio {
        Ratio::Defined(v) => format!("{:.*}%", decimals, v * 100.0),
        Ratio::Undefined => UNDEFINED_RATIO.to_string(),
    }
}

/// Summary of a cleaning run.
#[derive(Debug, Clone, Serialize)]
pub struct CleaningSummary {
    /// Rows in the input.
    pub rows_before: usize,
    /// Rows kept.
    pub rows_after: usize,
    /// Rows removed.
    pub rows_deleted: usize,
    /// Deleted rows over original rows (`None` when undefined).
    pub deleted_rows_ratio: Option<f64>,
    /// Deleted units over total units (`None` when undefined).
    pub units_deleted_ratio: Option<f64>,
    /// Deleted run time over total run time (`None` when undefined).
    pub runtime_deleted_ratio: Option<f64>,
    /// Rows removed per cascade stage.
    pub filter_stats: FilterStats,
    /// Values that failed numeric coercion.
    pub parse_warnings: usize,
    /// Decimal places used by the text rendering.
    #[serde(skip)]
    pub decimals: usize,
}

impl CleaningSummary {
    /// Summarize a cleaning result.
    pub fn new(result: &CleaningResult, decimals: usize) -> Self {
        Self {
            rows_before: result.original_rows(),
            rows_after: result.records().len(),
            rows_deleted: result.deleted_rows(),
            deleted_rows_ratio: result.deleted_rows_ratio().value(),
            units_deleted_ratio: result.units_deleted_ratio().value(),
            runtime_deleted_ratio: result.runtime_deleted_ratio().value(),
            filter_stats: *result.filter_stats(),
            parse_warnings: result.warnings().len(),
            decimals,
        }
    }

    /// Ratio lines as `(label, formatted percentage)` pairs.
    pub fn lines(&self) -> [(&'static str, String); 3] {
        let render = |v: Option<f64>| {
            format_ratio(v.map_or(Ratio::Undefined, Ratio::Defined), self.decimals)
        };
        [
            ("Deleted rows", render(self.deleted_rows_ratio)),
            ("Deleted units produced", render(self.units_deleted_ratio)),
            ("Deleted run time", render(self.runtime_deleted_ratio)),
        ]
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for CleaningSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.lines() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}
