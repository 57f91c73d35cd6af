//! Cleaned table writing.

use crate::locale::format_number_with_decimal;
use csv::{QuoteStyle, WriterBuilder};
use runclean_core::{config::OutputConfig, Cell, Error, Result};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// CSV writer for coerced rows.
///
/// Numeric cells use the configured decimal separator; text cells are
/// written verbatim and missing cells as empty fields.
#[derive(Debug, Clone)]
pub struct TableWriter {
    /// Field delimiter.
    delimiter: u8,
    /// Decimal separator for numeric cells.
    decimal_separator: char,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self {
            delimiter: b';',
            decimal_separator: ',',
        }
    }
}

impl TableWriter {
    /// Create a writer from the output configuration.
    ///
    /// Fails when the configured delimiter is not a single ASCII byte.
    pub fn new(config: &OutputConfig) -> Result<Self> {
        Ok(Self {
            delimiter: config.delimiter_byte()?,
            decimal_separator: config.decimal_separator,
        })
    }

    /// Render one cell as an output field.
    pub fn render_cell(&self, cell: &Cell) -> String {
        match cell {
            Cell::Number(v) => format_number_with_decimal(*v, self.decimal_separator),
            Cell::Text(s) => s.clone(),
            Cell::Missing => String::new(),
        }
    }

    /// Write headers and rows to any writer.
    pub fn write<W, I, R>(&self, out: W, headers: &[String], rows: I) -> Result<()>
    where
        W: Write,
        I: IntoIterator<Item = R>,
        R: AsRef<[Cell]>,
    {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .from_writer(out);

        writer.write_record(headers)?;
        let mut count = 0usize;
        for row in rows {
            writer.write_record(row.as_ref().iter().map(|cell| self.render_cell(cell)))?;
            count += 1;
        }
        writer.flush()?;

        debug!(rows = count, "wrote cleaned table");
        Ok(())
    }

    /// Write headers and rows into a byte buffer.
    pub fn write_to_vec<I, R>(&self, headers: &[String], rows: I) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[Cell]>,
    {
        let mut buffer = Vec::new();
        self.write(&mut buffer, headers, rows)?;
        Ok(buffer)
    }

    /// Write headers and rows to a file, replacing it.
    pub fn write_path<I, R>(&self, path: &Path, headers: &[String], rows: I) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[Cell]>,
    {
        let file = std::fs::File::create(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("creating {}: {e}", path.display()),
            ))
        })?;
        self.write(std::io::BufWriter::new(file), headers, rows)
    }
}
