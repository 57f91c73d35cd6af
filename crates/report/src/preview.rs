//! Plain-text preview of the first cleaned rows.

use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};
use prettytable::{Cell as TableCell, Row, Table};
use runclean_cleaning::CleaningResult;
use runclean_core::Cell;
use runclean_ingestion::format_number;

fn display(cell: &Cell) -> String {
    match cell {
        Cell::Number(v) => format_number(*v),
        Cell::Text(s) => s.clone(),
        Cell::Missing => String::new(),
    }
}

/// Render up to `limit` cleaned rows as a left-aligned table with a header
/// rule. Columns are separated by two spaces.
pub fn render_preview(result: &CleaningResult, limit: usize) -> String {
    let mut table = Table::new();
    table.set_format(
        FormatBuilder::new()
            .column_separator(' ')
            .separator(LinePosition::Title, LineSeparator::new('-', ' ', ' ', ' '))
            .padding(0, 1)
            .build(),
    );
    table.set_titles(Row::new(
        result.headers().iter().map(|h| TableCell::new(h)).collect(),
    ));
    for record in result.records().iter().take(limit) {
        table.add_row(Row::new(
            record
                .cells()
                .iter()
                .map(|c| TableCell::new(&display(c)))
                .collect(),
        ));
    }

    let mut out = String::new();
    for line in table.to_string().lines() {
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
