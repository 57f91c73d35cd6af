//! Totals and discard ratios.

use crate::{coerce::ParsedRecord, schema::Schema};
use runclean_core::{MetricColumn, Ratio};
use serde::Serialize;

/// Row count and summed metrics over a set of records.
///
/// Missing values are left out of the sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Number of rows.
    pub rows: usize,
    /// Sum of units produced.
    pub units: f64,
    /// Sum of run time.
    pub run_time: f64,
}

impl Totals {
    /// Accumulate totals over records.
    pub fn over<'a, I>(records: I, schema: &Schema) -> Self
    where
        I: IntoIterator<Item = &'a ParsedRecord>,
    {
        records.into_iter().fold(Totals::default(), |mut acc, r| {
            acc.rows += 1;
            acc.units += r.metric(schema, MetricColumn::UnitsProduced).unwrap_or(0.0);
            acc.run_time += r.metric(schema, MetricColumn::RunTime).unwrap_or(0.0);
            acc
        })
    }
}

/// Share of rows, units and run time removed by cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiscardRatios {
    /// Deleted rows over original rows.
    pub rows: Ratio,
    /// Deleted units over total units.
    pub units: Ratio,
    /// Deleted run time over total run time.
    pub run_time: Ratio,
}

impl DiscardRatios {
    /// Compare the totals before and after cleaning.
    pub fn between(baseline: &Totals, surviving: &Totals) -> Self {
        Self {
            rows: Ratio::discarded(baseline.rows as f64, surviving.rows as f64),
            units: Ratio::discarded(baseline.units, surviving.units),
            run_time: Ratio::discarded(baseline.run_time, surviving.run_time),
        }
    }
}
