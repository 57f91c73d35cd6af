//! Numeric coercion of raw rows.
//!
//! The quantity columns are parsed as locale numbers and the deviation
//! column as a percentage. A value that does not parse becomes
//! [`Cell::Missing`], which the filter cascade later discards. Passthrough
//! columns typed as float become numbers; everything else stays text.

use crate::schema::{Passthrough, Schema};
use runclean_core::{Cell, MetricColumn, RawRow};
use runclean_ingestion::{parse_locale_number, parse_percent};
use serde::Serialize;
use tracing::debug;

/// A required-column value that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// Source line of the row.
    pub line: u64,
    /// Column header.
    pub column: String,
    /// The offending raw value.
    pub value: String,
}

/// A row after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    /// Source line of the row.
    pub line: u64,
    /// One cell per header.
    pub cells: Vec<Cell>,
}

impl ParsedRecord {
    /// Numeric value of a required column.
    #[inline]
    pub fn metric(&self, schema: &Schema, column: MetricColumn) -> Option<f64> {
        self.cells
            .get(schema.index(column))
            .and_then(Cell::as_number)
    }

    /// Whether no cell is missing.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|c| !c.is_missing())
    }
}

/// Coerce a single value of a required column.
pub fn coerce_metric(column: MetricColumn, raw: &str) -> Option<f64> {
    if column.is_percent() {
        parse_percent(raw)
    } else {
        parse_locale_number(raw)
    }
}

fn coerce_passthrough(kind: Passthrough, text: String) -> Cell {
    match kind {
        Passthrough::Float => match text.parse::<f64>() {
            Ok(v) => Cell::Number(v),
            Err(_) => Cell::Text(text),
        },
        Passthrough::Text => Cell::Text(text),
    }
}

/// Coerce one row, pushing a warning for every value that fails to parse.
pub fn coerce_row(
    row: RawRow,
    schema: &Schema,
    warnings: &mut Vec<ParseWarning>,
) -> ParsedRecord {
    let mut fields = row.fields.into_iter();
    let cells = (0..schema.width())
        .map(|idx| {
            let field = fields.next().flatten();
            match (schema.metric_at(idx), field) {
                (_, None) => Cell::Missing,
                (None, Some(text)) => coerce_passthrough(schema.passthrough(idx), text),
                (Some(column), Some(text)) => match coerce_metric(column, &text) {
                    Some(v) => Cell::Number(v),
                    None => {
                        debug!(
                            line = row.line,
                            column = column.key(),
                            value = %text,
                            "unparseable value"
                        );
                        warnings.push(ParseWarning {
                            line: row.line,
                            column: schema.headers()[idx].clone(),
                            value: text,
                        });
                        Cell::Missing
                    }
                },
            }
        })
        .collect();

    ParsedRecord {
        line: row.line,
        cells,
    }
}

/// Coerce every row, preserving order.
pub fn coerce_rows(rows: Vec<RawRow>, schema: &Schema) -> (Vec<ParsedRecord>, Vec<ParseWarning>) {
    let mut warnings = Vec::new();
    let records = rows
        .into_iter()
        .map(|row| coerce_row(row, schema, &mut warnings))
        .collect();
    (records, warnings)
}
