//! Raw table reading.
//!
//! The export carries one title line above the real header row, so a fixed
//! number of physical lines is dropped before CSV parsing starts.

use csv::{ReaderBuilder, Trim};
use runclean_core::{config::InputConfig, is_na_token, Error, RawRow, RawTable, Result};
use std::path::Path;
use tracing::{debug, warn};

/// CSV reader producing [`RawTable`]s.
#[derive(Debug, Clone)]
pub struct TableReader {
    /// Field delimiter.
    delimiter: u8,
    /// Physical lines dropped before the header.
    skip_leading_lines: usize,
}

impl Default for TableReader {
    fn default() -> Self {
        Self {
            delimiter: b',',
            skip_leading_lines: 1,
        }
    }
}

impl TableReader {
    /// Create a reader from the input configuration.
    ///
    /// Fails when the configured delimiter is not a single ASCII byte.
    pub fn new(config: &InputConfig) -> Result<Self> {
        Ok(Self {
            delimiter: config.delimiter_byte()?,
            skip_leading_lines: config.skip_leading_lines,
        })
    }

    /// Set a custom delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the number of leading lines to skip.
    pub fn with_skip_leading_lines(mut self, lines: usize) -> Self {
        self.skip_leading_lines = lines;
        self
    }

    /// Read a table from a file.
    pub fn read_path(&self, path: &Path) -> Result<RawTable> {
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = data.len(), "read input file");
        self.read_bytes(&data)
    }

    /// Read a table from raw bytes.
    pub fn read_bytes(&self, data: &[u8]) -> Result<RawTable> {
        let decoded = match std::str::from_utf8(data) {
            Ok(text) => std::borrow::Cow::Borrowed(text),
            Err(e) => {
                warn!(valid_up_to = e.valid_up_to(), "input is not valid UTF-8, decoding lossily");
                String::from_utf8_lossy(data)
            }
        };
        let text = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);
        let (body, skipped) = skip_lines(text, self.skip_leading_lines);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::None)
            .flexible(true)
            .has_headers(true)
            .from_reader(body.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(Error::data("input has no header row"));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or(0) + skipped;

            if record.len() > headers.len() {
                return Err(Error::data(format!(
                    "line {line}: expected {} fields, found {}",
                    headers.len(),
                    record.len()
                )));
            }

            let fields = (0..headers.len())
                .map(|idx| {
                    record
                        .get(idx)
                        .filter(|value| !is_na_token(value))
                        .map(str::to_string)
                })
                .collect();
            rows.push(RawRow { line, fields });
        }

        debug!(columns = headers.len(), rows = rows.len(), "parsed raw table");
        Ok(RawTable { headers, rows })
    }
}

/// Drop up to `n` physical lines, returning the rest and how many were dropped.
fn skip_lines(text: &str, n: usize) -> (&str, u64) {
    let mut rest = text;
    let mut skipped = 0u64;
    for _ in 0..n {
        if rest.is_empty() {
            break;
        }
        rest = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => "",
        };
        skipped += 1;
    }
    (rest, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXPORT: &str = "Informe de produccion,,,\n\
        Uds. fabricadas,Run Time,Tpo STD,Desv vs STD\n\
        \"1,5\",10,12,\"5,2%\"\n\
        3,4,5,-1%\n";

    #[test]
    fn test_skips_title_line() {
        let table = TableReader::default().read_bytes(EXPORT.as_bytes()).unwrap();

        assert_eq!(
            table.headers,
            vec!["Uds. fabricadas", "Run Time", "Tpo STD", "Desv vs STD"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].field(0), Some("1,5"));
        assert_eq!(table.rows[0].field(3), Some("5,2%"));
        assert_eq!(table.rows[1].field(3), Some("-1%"));
    }

    #[test]
    fn test_line_numbers_account_for_skipped_lines() {
        let table = TableReader::default().read_bytes(EXPORT.as_bytes()).unwrap();
        assert_eq!(table.rows[0].line, 3);
        assert_eq!(table.rows[1].line, 4);
    }

    #[test]
    fn test_na_tokens_and_short_rows_are_missing() {
        let data = "title\na,b,c\nNA,,x\n1\n";
        let table = TableReader::default().read_bytes(data.as_bytes()).unwrap();

        assert_eq!(table.rows[0].fields, vec![None, None, Some("x".to_string())]);
        assert_eq!(table.rows[1].fields, vec![Some("1".to_string()), None, None]);
    }

    #[test]
    fn test_whitespace_is_not_missing() {
        let data = "title\na,b\n ,x\n";
        let table = TableReader::default().read_bytes(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0].field(0), Some(" "));
    }

    #[test]
    fn test_long_row_is_rejected() {
        let data = "title\na,b\n1,2,3\n";
        let err = TableReader::default().read_bytes(data.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Data(msg) if msg.contains("line 3")));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let err = TableReader::default().read_bytes(b"only a title line\n").unwrap_err();
        assert!(matches!(err, Error::Data(_)));
    }

    #[test]
    fn test_blank_lines_ignored() {
        let data = "title\na,b\n\n1,2\n\n";
        let table = TableReader::default().read_bytes(data.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_bom_and_custom_format() {
        let data = "\u{feff}a;b\n1,5;2\n";
        let table = TableReader::default()
            .with_delimiter(b';')
            .with_skip_leading_lines(0)
            .read_bytes(data.as_bytes())
            .unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows[0].field(0), Some("1,5"));
    }

    #[test]
    fn test_new_from_config() {
        let config = InputConfig {
            delimiter: ';',
            skip_leading_lines: 0,
        };
        let reader = TableReader::new(&config).unwrap();
        let table = reader.read_bytes(b"a;b\n1;2\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);

        let config = InputConfig {
            delimiter: '¦',
            ..InputConfig::default()
        };
        assert!(matches!(TableReader::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_read_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let table = TableReader::default().read_path(file.path()).unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_skip_lines() {
        assert_eq!(skip_lines("a\nb\nc", 2), ("c", 2));
        assert_eq!(skip_lines("a", 3), ("", 1));
        assert_eq!(skip_lines("a\nb", 0), ("a\nb", 0));
    }
}
