//! CSV serialization of export rows.

use super::export::ExportRow;
use chrono::NaiveDate;

/// Byte order mark prepended to downloaded files so spreadsheets pick UTF-8.
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Serialize rows as CSV.
///
/// The header is taken from the first row's columns; later rows are read by
/// column name and missing cells are empty. Lines are joined with `\n` and no
/// trailing newline is written. An empty input yields an empty string.
pub fn export_csv(rows: &[ExportRow]) -> String {
    let Some(first) = rows.first() else {
        return String::new();
    };

    let headers: Vec<&str> = first.columns().collect();
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| escape_cell(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for row in rows {
        let line = headers
            .iter()
            .map(|h| escape_cell(row.get(h).unwrap_or("")))
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }

    lines.join("\n")
}

/// CSV file contents ready to write to disk: BOM followed by [`export_csv`].
pub fn csv_document(rows: &[ExportRow]) -> String {
    format!("{}{}", UTF8_BOM, export_csv(rows))
}

/// Download file name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("avg-price-scenarios-{}.csv", date.format("%Y-%m-%d"))
}

/// Quote a cell containing a comma, double quote or newline, doubling inner quotes.
fn escape_cell(cell: &str) -> String {
    if cell.contains(['"', ',', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
