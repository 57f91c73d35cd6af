//! End-to-end cleaning of a raw table.
//!
//! [`clean`] is a pure function of its input: type the passthrough columns,
//! coerce, total, filter, total again, then render the deviation column for
//! display.

use crate::{
    aggregate::{DiscardRatios, Totals},
    coerce::{coerce_rows, ParseWarning, ParsedRecord},
    filter::{apply_cascade, FilterStats},
    schema::Schema,
};
use runclean_core::{Cell, MetricColumn, RawRow, RawTable, Ratio, Result};
use runclean_ingestion::format_number;
use tracing::{info, warn};

/// A row that survived every filter.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRecord {
    line: u64,
    cells: Vec<Cell>,
}

impl CleanedRecord {
    /// Render the deviation cell as display text with a `%` suffix.
    fn from_parsed(record: ParsedRecord, schema: &Schema) -> Self {
        let idx = schema.index(MetricColumn::DeviationVsStandard);
        let mut cells = record.cells;
        if let Some(v) = cells.get(idx).and_then(Cell::as_number) {
            cells[idx] = Cell::Text(format!("{}%", format_number(v)));
        }
        Self {
            line: record.line,
            cells,
        }
    }

    /// Source line of the row.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Cells, one per header.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

impl AsRef<[Cell]> for CleanedRecord {
    fn as_ref(&self) -> &[Cell] {
        &self.cells
    }
}

/// Outcome of a cleaning run.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    schema: Schema,
    records: Vec<CleanedRecord>,
    baseline: Totals,
    surviving: Totals,
    ratios: DiscardRatios,
    stats: FilterStats,
    warnings: Vec<ParseWarning>,
}

impl CleaningResult {
    /// Column headers, identical to the input's.
    pub fn headers(&self) -> &[String] {
        self.schema.headers()
    }

    /// Resolved column positions.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Surviving rows, in input order.
    pub fn records(&self) -> &[CleanedRecord] {
        &self.records
    }

    /// Totals over the whole input.
    pub fn baseline(&self) -> &Totals {
        &self.baseline
    }

    /// Totals over the surviving rows.
    pub fn surviving(&self) -> &Totals {
        &self.surviving
    }

    /// Rows in the input.
    pub fn original_rows(&self) -> usize {
        self.baseline.rows
    }

    /// Rows removed by the cascade.
    pub fn deleted_rows(&self) -> usize {
        self.baseline.rows - self.surviving.rows
    }

    /// All three discard ratios.
    pub fn ratios(&self) -> &DiscardRatios {
        &self.ratios
    }

    /// Deleted rows over original rows.
    pub fn deleted_rows_ratio(&self) -> Ratio {
        self.ratios.rows
    }

    /// Deleted units produced over total units produced.
    pub fn units_deleted_ratio(&self) -> Ratio {
        self.ratios.units
    }

    /// Deleted run time over total run time.
    pub fn runtime_deleted_ratio(&self) -> Ratio {
        self.ratios.run_time
    }

    /// Rows removed per cascade stage.
    pub fn filter_stats(&self) -> &FilterStats {
        &self.stats
    }

    /// Values that failed numeric coercion.
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Render the cleaned rows back into a raw table, numbers in dotted form.
    pub fn to_raw_table(&self) -> RawTable {
        let rows = self
            .records
            .iter()
            .map(|r| RawRow {
                line: r.line,
                fields: r
                    .cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::Number(v) => Some(format_number(*v)),
                        Cell::Text(s) => Some(s.clone()),
                        Cell::Missing => None,
                    })
                    .collect(),
            })
            .collect();
        RawTable {
            headers: self.headers().to_vec(),
            rows,
        }
    }
}

/// Clean a raw table.
///
/// Fails only when a required column is absent. Unparseable values are
/// collected as warnings and their rows discarded by the cascade.
pub fn clean(raw: RawTable) -> Result<CleaningResult> {
    let schema = Schema::resolve(&raw.headers)?.with_passthrough_types(&raw.rows);
    let (parsed, warnings) = coerce_rows(raw.rows, &schema);

    let baseline = Totals::over(&parsed, &schema);
    let (kept, stats) = apply_cascade(parsed, &schema);
    let surviving = Totals::over(&kept, &schema);
    let ratios = DiscardRatios::between(&baseline, &surviving);

    for (name, ratio) in [
        ("rows", ratios.rows),
        ("units", ratios.units),
        ("run_time", ratios.run_time),
    ] {
        if !ratio.is_defined() {
            warn!(ratio = name, "discard ratio undefined: baseline total is zero");
        }
    }

    let records: Vec<CleanedRecord> = kept
        .into_iter()
        .map(|r| CleanedRecord::from_parsed(r, &schema))
        .collect();

    info!(
        rows_before = baseline.rows,
        rows_after = surviving.rows,
        missing_deviation = stats.missing_deviation,
        below_threshold = stats.below_threshold,
        incomplete = stats.incomplete,
        parse_warnings = warnings.len(),
        "cleaned table"
    );

    Ok(CleaningResult {
        schema,
        records,
        baseline,
        surviving,
        ratios,
        stats,
        warnings,
    })
}
