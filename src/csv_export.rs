//! Formats rows as CSV text for spreadsheet tools.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::Error;

/// The byte order mark that tells spreadsheet tools the text is UTF-8.
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Format `header` and `rows` as CSV, projecting each row to its fields with `project`.
///
/// Fields are quoted only when they contain a comma, a double quote or a
/// newline, with inner quotes doubled. Rows are joined with `\n`, there is no
/// trailing newline, and the text starts with [BYTE_ORDER_MARK].
///
/// # Errors
/// Returns an [Error::CsvExportError] if the writer fails, e.g. when a row
/// has a different number of fields than the header.
pub fn to_csv<T>(
    header: &[&str],
    rows: &[T],
    project: impl Fn(&T) -> Vec<String>,
) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header).map_err(csv_error)?;

    for row in rows {
        writer.write_record(project(row)).map_err(csv_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvExportError(error.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|error| Error::CsvExportError(error.to_string()))?;
    let text = text.strip_suffix('\n').unwrap_or(&text);

    Ok(format!("{BYTE_ORDER_MARK}{text}"))
}

fn csv_error(error: csv::Error) -> Error {
    tracing::error!("could not write CSV record: {error}");
    Error::CsvExportError(error.to_string())
}
