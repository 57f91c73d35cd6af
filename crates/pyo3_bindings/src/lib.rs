//! PyO3 bindings for the runclean pipeline.
//!
//! Lets a Python front end (upload widget, table view, download button) hand
//! raw export bytes to the Rust pipeline and get back the cleaned table and
//! the discard ratios.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

use runclean_cleaning::CleaningResult;
use runclean_core::{Config, Error as RustError};
use runclean_ingestion::{TableReader, TableWriter};
use runclean_report::{render_preview, CleaningSummary};

fn to_py_err(e: RustError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Result of cleaning one export.
#[pyclass]
pub struct CleanedTable {
    result: CleaningResult,
    csv: Vec<u8>,
    decimals: usize,
}

#[pymethods]
impl CleanedTable {
    /// Cleaned table, semicolon separated with comma decimals.
    #[getter]
    fn csv<'py>(&self, py: Python<'py>) -> Bound<'py, PyBytes> {
        PyBytes::new_bound(py, &self.csv)
    }

    /// Column headers.
    #[getter]
    fn headers(&self) -> Vec<String> {
        self.result.headers().to_vec()
    }

    /// Deleted rows over original rows, `None` when undefined.
    #[getter]
    fn deleted_rows_ratio(&self) -> Option<f64> {
        self.result.deleted_rows_ratio().value()
    }

    /// Deleted units produced over total units produced, `None` when undefined.
    #[getter]
    fn units_deleted_ratio(&self) -> Option<f64> {
        self.result.units_deleted_ratio().value()
    }

    /// Deleted run time over total run time, `None` when undefined.
    #[getter]
    fn runtime_deleted_ratio(&self) -> Option<f64> {
        self.result.runtime_deleted_ratio().value()
    }

    /// Rows in the input.
    #[getter]
    fn rows_before(&self) -> usize {
        self.result.original_rows()
    }

    /// Rows that survived cleaning.
    #[getter]
    fn rows_after(&self) -> usize {
        self.result.records().len()
    }

    /// Unparseable values as `(line, column, value)` tuples.
    fn warnings(&self) -> Vec<(u64, String, String)> {
        self.result
            .warnings()
            .iter()
            .map(|w| (w.line, w.column.clone(), w.value.clone()))
            .collect()
    }

    /// Ratio summary, one labelled percentage per line.
    fn summary(&self) -> String {
        CleaningSummary::new(&self.result, self.decimals).to_string()
    }

    /// Plain-text preview of the first `n` cleaned rows.
    #[pyo3(signature = (n = 5))]
    fn preview(&self, n: usize) -> String {
        render_preview(&self.result, n)
    }

    fn __repr__(&self) -> String {
        format!(
            "CleanedTable(rows_before={}, rows_after={})",
            self.result.original_rows(),
            self.result.records().len()
        )
    }
}

// ============================================================================
// Functions
// ============================================================================

/// Clean a raw export.
///
/// Raises `ValueError` when a required column is missing or the table is
/// malformed.
#[pyfunction]
#[pyo3(signature = (data, skip_leading_lines = 1))]
fn clean_csv(data: &[u8], skip_leading_lines: usize) -> PyResult<CleanedTable> {
    let mut config = Config::default();
    config.input.skip_leading_lines = skip_leading_lines;

    let raw = TableReader::new(&config.input)
        .and_then(|reader| reader.read_bytes(data))
        .map_err(to_py_err)?;
    let result = runclean_cleaning::clean(raw).map_err(to_py_err)?;
    let csv = TableWriter::new(&config.output)
        .and_then(|writer| writer.write_to_vec(result.headers(), result.records()))
        .map_err(to_py_err)?;

    Ok(CleanedTable {
        result,
        csv,
        decimals: config.report.ratio_decimals,
    })
}

// ============================================================================
// Module Definition
// ============================================================================

/// runclean - manufacturing run-metrics cleaning for Python.
#[pymodule]
fn runclean_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<CleanedTable>()?;
    m.add_function(wrap_pyfunction!(clean_csv, m)?)?;
    Ok(())
}
