//! Configuration structures for the runclean system.
//!
//! Only the table format and the reporting surface are configurable. The
//! cleaning rules and column names are fixed.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input table format.
    pub input: InputConfig,
    /// Output table format.
    pub output: OutputConfig,
    /// Reporting configuration.
    pub report: ReportConfig,
}

impl Config {
    /// Parse a configuration from JSON. Missing sections use defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Check that the delimiters can be used by the CSV reader and writer.
    pub fn validate(&self) -> Result<()> {
        self.input.delimiter_byte()?;
        self.output.delimiter_byte()?;
        if self.output.decimal_separator == self.output.delimiter {
            return Err(Error::config(
                "output decimal separator must differ from the output delimiter",
            ));
        }
        Ok(())
    }
}

/// A delimiter as a single ASCII byte.
fn ascii_byte(c: char, what: &str) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| Error::config(format!("{what} delimiter must be ASCII, got {c:?}")))
}

/// Input table format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Field delimiter.
    pub delimiter: char,
    /// Physical lines dropped before the header row.
    pub skip_leading_lines: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            skip_leading_lines: 1,
        }
    }
}

impl InputConfig {
    /// Delimiter as the byte expected by the CSV reader.
    pub fn delimiter_byte(&self) -> Result<u8> {
        ascii_byte(self.delimiter, "input")
    }
}

/// Output table format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Field delimiter.
    pub delimiter: char,
    /// Decimal separator for numeric cells.
    pub decimal_separator: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
        }
    }
}

impl OutputConfig {
    /// Delimiter as the byte expected by the CSV writer.
    pub fn delimiter_byte(&self) -> Result<u8> {
        ascii_byte(self.delimiter, "output")
    }
}

/// Reporting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Cleaned rows shown in the preview.
    pub preview_rows: usize,
    /// Decimal places for ratio percentages.
    pub ratio_decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            ratio_decimals: 2,
        }
    }
}
