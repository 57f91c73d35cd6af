//! Core data types for the runclean system.

use serde::{Deserialize, Serialize};

/// Minimum accepted value for the quantity columns (inclusive).
pub const MIN_QUANTITY: f64 = 1.0;

/// Cell values read as missing, in addition to the empty string.
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Is this raw value a missing marker?
pub fn is_na_token(value: &str) -> bool {
    value.is_empty() || NA_TOKENS.contains(&value)
}

/// One of the four fixed columns the pipeline requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricColumn {
    /// Units produced in the run.
    UnitsProduced,
    /// Actual run time.
    RunTime,
    /// Standard (reference) time for the run.
    StandardTime,
    /// Percentage deviation of run time against standard time.
    DeviationVsStandard,
}

impl MetricColumn {
    /// All required columns, in reporting order.
    pub const ALL: [MetricColumn; 4] = [
        MetricColumn::UnitsProduced,
        MetricColumn::RunTime,
        MetricColumn::StandardTime,
        MetricColumn::DeviationVsStandard,
    ];

    /// Columns that must be at least [`MIN_QUANTITY`].
    pub const QUANTITIES: [MetricColumn; 3] = [
        MetricColumn::UnitsProduced,
        MetricColumn::RunTime,
        MetricColumn::StandardTime,
    ];

    /// Position in [`MetricColumn::ALL`].
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Snake-case key.
    pub fn key(self) -> &'static str {
        match self {
            MetricColumn::UnitsProduced => "units_produced",
            MetricColumn::RunTime => "run_time",
            MetricColumn::StandardTime => "standard_time",
            MetricColumn::DeviationVsStandard => "deviation_vs_standard",
        }
    }

    /// Column title used by the production export.
    pub fn title(self) -> &'static str {
        match self {
            MetricColumn::UnitsProduced => "Uds. fabricadas",
            MetricColumn::RunTime => "Run Time",
            MetricColumn::StandardTime => "Tpo STD",
            MetricColumn::DeviationVsStandard => "Desv vs STD",
        }
    }

    /// Whether a header names this column (by key or by export title).
    pub fn matches(self, header: &str) -> bool {
        let header = header.trim();
        header == self.key() || header == self.title()
    }

    /// Whether the column holds a percentage.
    pub fn is_percent(self) -> bool {
        self == MetricColumn::DeviationVsStandard
    }
}

/// A single table cell after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// Parsed numeric value.
    Number(f64),
    /// Text value (passthrough columns and display-formatted values).
    Text(String),
    /// Absent or unparseable value.
    Missing,
}

impl Cell {
    /// Is this cell missing?
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Numeric value, if any.
    #[inline]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Text value, if any.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// A row as read from the source. `None` fields are missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source (0 for rows built in memory).
    pub line: u64,
    /// Field values, one per header.
    pub fields: Vec<Option<String>>,
}

impl RawRow {
    /// Field at a column index.
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).and_then(|f| f.as_deref())
    }
}

/// An uncoerced table: header plus string rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column headers, in source order.
    pub headers: Vec<String>,
    /// Data rows, in source order.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create an empty table with the given headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row of raw values. Empty strings and [`NA_TOKENS`] become
    /// missing, as they do when a table is read from disk.
    pub fn push_row<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = values
            .into_iter()
            .map(Into::into)
            .map(|v: String| if is_na_token(&v) { None } else { Some(v) })
            .collect();
        self.rows.push(RawRow { line: 0, fields });
    }

    /// Builder-style [`RawTable::push_row`].
    pub fn with_row<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(values);
        self
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Discarded share of some total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Ratio {
    /// A well-defined quotient.
    Defined(f64),
    /// Zero denominator or non-finite quotient.
    Undefined,
}

impl Ratio {
    /// `(total - kept) / total`, undefined when `total` is zero or the
    /// quotient is not finite.
    pub fn discarded(total: f64, kept: f64) -> Self {
        if total == 0.0 {
            return Ratio::Undefined;
        }
        let ratio = (total - kept) / total;
        if ratio.is_finite() {
            Ratio::Defined(ratio)
        } else {
            Ratio::Undefined
        }
    }

    /// Value, if defined.
    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(v),
            Ratio::Undefined => None,
        }
    }

    /// Is this ratio defined?
    pub fn is_defined(self) -> bool {
        matches!(self, Ratio::Defined(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_metric_column_matches_key_and_title() {
        assert!(MetricColumn::UnitsProduced.matches("units_produced"));
        assert!(MetricColumn::UnitsProduced.matches("Uds. fabricadas"));
        assert!(MetricColumn::RunTime.matches(" Run Time "));
        assert!(!MetricColumn::RunTime.matches("run time"));
        assert!(MetricColumn::DeviationVsStandard.is_percent());
        assert!(!MetricColumn::StandardTime.is_percent());
    }

    #[test]
    fn test_raw_table_builder() {
        let table = RawTable::new(["a", "b"]).with_row(["1", ""]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].field(0), Some("1"));
        assert_eq!(table.rows[0].field(1), None);
        assert_eq!(table.rows[0].field(5), None);
    }

    #[test]
    fn test_push_row_treats_na_tokens_as_missing() {
        let table = RawTable::new(["a", "b", "c", "d"]).with_row(["NA", "n/a", " NA", "NAN"]);
        assert_eq!(table.rows[0].field(0), None);
        assert_eq!(table.rows[0].field(1), None);
        // Matching is exact: padded or differently-cased markers stay present.
        assert_eq!(table.rows[0].field(2), Some(" NA"));
        assert_eq!(table.rows[0].field(3), Some("NAN"));
    }

    #[test]
    fn test_is_na_token() {
        assert!(is_na_token(""));
        assert!(is_na_token("#N/A"));
        assert!(is_na_token("null"));
        assert!(!is_na_token("0"));
        assert!(!is_na_token("n/d"));
    }

    #[test]
    fn test_cell_accessors() {
        assert_eq!(Cell::Number(1.5).as_number(), Some(1.5));
        assert_eq!(Cell::Text("x".into()).as_text(), Some("x"));
        assert!(Cell::Missing.is_missing());
        assert_eq!(Cell::Missing.as_number(), None);
    }

    #[test]
    fn test_ratio_discarded() {
        let ratio = Ratio::discarded(3.0, 1.0);
        assert_relative_eq!(ratio.value().unwrap(), 2.0 / 3.0);
        assert_eq!(Ratio::discarded(10.0, 10.0), Ratio::Defined(0.0));
    }

    #[test]
    fn test_ratio_zero_total_is_undefined() {
        assert_eq!(Ratio::discarded(0.0, 0.0), Ratio::Undefined);
        assert!(!Ratio::discarded(0.0, 5.0).is_defined());
    }

    #[test]
    fn test_ratio_infinite_total_is_undefined() {
        assert_eq!(Ratio::discarded(f64::INFINITY, 1.0), Ratio::Undefined);
    }
}
