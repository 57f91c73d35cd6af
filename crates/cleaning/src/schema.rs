//! Location of the required columns within a table header, and the type of
//! every other column.

use runclean_core::{Error, MetricColumn, RawRow, Result};

/// How a column outside the required set is carried to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    /// Written back verbatim. Covers free text and whole-number columns
    /// with no missing values.
    Text,
    /// Every present value reads as a dotted float, so the column is
    /// written with the output decimal separator.
    Float,
}

impl Passthrough {
    /// Infer the type of one column from its raw values.
    ///
    /// A whole-number column with a gap is widened to float, as a missing
    /// value has no integer representation.
    pub fn infer<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut present = false;
        let mut gaps = false;
        let mut integral = true;
        for value in values {
            match value {
                None => gaps = true,
                Some(v) if v.parse::<f64>().is_ok() => {
                    present = true;
                    integral &= v.parse::<i64>().is_ok();
                }
                Some(_) => return Passthrough::Text,
            }
        }
        if present && (gaps || !integral) {
            Passthrough::Float
        } else {
            Passthrough::Text
        }
    }
}

/// Header plus the index of every required column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    headers: Vec<String>,
    /// Indexed in [`MetricColumn::ALL`] order.
    indices: [usize; 4],
    /// One entry per header; required columns are always `Text`.
    passthrough: Vec<Passthrough>,
}

impl Schema {
    /// Locate the required columns, failing on the first one that is absent.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let mut indices = [0usize; 4];
        for (slot, column) in indices.iter_mut().zip(MetricColumn::ALL) {
            *slot = headers
                .iter()
                .position(|h| column.matches(h))
                .ok_or_else(|| Error::schema(column.title()))?;
        }
        Ok(Self {
            headers: headers.to_vec(),
            indices,
            passthrough: vec![Passthrough::Text; headers.len()],
        })
    }

    /// Type the passthrough columns from the rows they will carry.
    pub fn with_passthrough_types(mut self, rows: &[RawRow]) -> Self {
        for idx in 0..self.width() {
            if self.metric_at(idx).is_none() {
                self.passthrough[idx] = Passthrough::infer(rows.iter().map(|r| r.field(idx)));
            }
        }
        self
    }

    /// How a column is carried to the output.
    pub fn passthrough(&self, idx: usize) -> Passthrough {
        self.passthrough.get(idx).copied().unwrap_or(Passthrough::Text)
    }

    /// Column headers, in table order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Index of a required column.
    #[inline]
    pub fn index(&self, column: MetricColumn) -> usize {
        self.indices[column.ordinal()]
    }

    /// Required column stored at a table index, if any.
    pub fn metric_at(&self, idx: usize) -> Option<MetricColumn> {
        MetricColumn::ALL
            .iter()
            .zip(self.indices)
            .find(|(_, i)| *i == idx)
            .map(|(c, _)| *c)
    }
}
