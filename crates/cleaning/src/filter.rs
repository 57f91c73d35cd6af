//! The filter cascade.
//!
//! Stages run in a fixed order, each over the survivors of the previous one:
//! missing deviation, quantities below [`MIN_QUANTITY`], then any missing cell.

use crate::{coerce::ParsedRecord, schema::Schema};
use runclean_core::{MetricColumn, MIN_QUANTITY};
use serde::Serialize;
use tracing::debug;

/// One step of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FilterStage {
    /// Drop rows whose deviation is missing.
    MissingDeviation,
    /// Drop rows where a quantity is missing or below the minimum.
    BelowThreshold,
    /// Drop rows with any missing cell.
    Incomplete,
}

impl FilterStage {
    /// Stages in application order.
    pub const CASCADE: [FilterStage; 3] = [
        FilterStage::MissingDeviation,
        FilterStage::BelowThreshold,
        FilterStage::Incomplete,
    ];

    /// Whether a record survives this stage.
    pub fn keeps(self, record: &ParsedRecord, schema: &Schema) -> bool {
        match self {
            FilterStage::MissingDeviation => record
                .metric(schema, MetricColumn::DeviationVsStandard)
                .is_some(),
            // A missing value never compares >= the minimum.
            FilterStage::BelowThreshold => MetricColumn::QUANTITIES.iter().all(|&column| {
                record
                    .metric(schema, column)
                    .is_some_and(|v| v >= MIN_QUANTITY)
            }),
            FilterStage::Incomplete => record.is_complete(),
        }
    }

    /// Short name for logs.
    pub fn name(self) -> &'static str {
        match self {
            FilterStage::MissingDeviation => "missing_deviation",
            FilterStage::BelowThreshold => "below_threshold",
            FilterStage::Incomplete => "incomplete",
        }
    }
}

/// Rows removed by each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    /// Removed for a missing deviation.
    pub missing_deviation: usize,
    /// Removed for a quantity below the minimum.
    pub below_threshold: usize,
    /// Removed for any other missing cell.
    pub incomplete: usize,
}

impl FilterStats {
    /// Total rows removed.
    pub fn total(&self) -> usize {
        self.missing_deviation + self.below_threshold + self.incomplete
    }

    fn record(&mut self, stage: FilterStage, removed: usize) {
        match stage {
            FilterStage::MissingDeviation => self.missing_deviation += removed,
            FilterStage::BelowThreshold => self.below_threshold += removed,
            FilterStage::Incomplete => self.incomplete += removed,
        }
    }
}

/// Run the full cascade, preserving the order of the survivors.
pub fn apply_cascade(
    mut records: Vec<ParsedRecord>,
    schema: &Schema,
) -> (Vec<ParsedRecord>, FilterStats) {
    let mut stats = FilterStats::default();
    for stage in FilterStage::CASCADE {
        let before = records.len();
        records.retain(|r| stage.keeps(r, schema));
        let removed = before - records.len();
        debug!(stage = stage.name(), removed, remaining = records.len(), "filter stage");
        stats.record(stage, removed);
    }
    (records, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::coerce_rows;
    use runclean_core::RawTable;

    fn parse(rows: &[[&str; 5]]) -> (Vec<ParsedRecord>, Schema) {
        let mut raw = RawTable::new([
            "units_produced",
            "run_time",
            "standard_time",
            "deviation_vs_standard",
            "shift",
        ]);
        for row in rows {
            raw.push_row(row.iter().copied());
        }
        let schema = Schema::resolve(&raw.headers).unwrap();
        let (records, _) = coerce_rows(raw.rows, &schema);
        (records, schema)
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let (records, schema) = parse(&[
            ["1", "1", "1", "0%", "A"],
            ["0,99", "5", "5", "0%", "A"],
        ]);
        assert!(FilterStage::BelowThreshold.keeps(&records[0], &schema));
        assert!(!FilterStage::BelowThreshold.keeps(&records[1], &schema));
    }

    #[test]
    fn test_missing_quantity_fails_threshold() {
        let (records, schema) = parse(&[["", "5", "5", "0%", "A"]]);
        assert!(FilterStage::MissingDeviation.keeps(&records[0], &schema));
        assert!(!FilterStage::BelowThreshold.keeps(&records[0], &schema));
    }

    #[test]
    fn test_cascade_attributes_removals_in_order() {
        let (records, schema) = parse(&[
            ["2", "2", "2", "5%", "A"],
            // Missing deviation and below threshold: counted by the first stage.
            ["0", "2", "2", "", "A"],
            ["2", "0,5", "2", "5%", "A"],
            // Only the passthrough cell is missing.
            ["2", "2", "2", "5%", ""],
            ["3", "3", "3", "-1%", "B"],
        ]);

        let (kept, stats) = apply_cascade(records, &schema);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].metric(&schema, MetricColumn::UnitsProduced), Some(2.0));
        assert_eq!(kept[1].metric(&schema, MetricColumn::UnitsProduced), Some(3.0));
        assert_eq!(
            stats,
            FilterStats {
                missing_deviation: 1,
                below_threshold: 1,
                incomplete: 1,
            }
        );
        assert_eq!(stats.total(), 3);
    }

    #[test]
    fn test_empty_input() {
        let (records, schema) = parse(&[]);
        let (kept, stats) = apply_cascade(records, &schema);
        assert!(kept.is_empty());
        assert_eq!(stats.total(), 0);
    }
}
