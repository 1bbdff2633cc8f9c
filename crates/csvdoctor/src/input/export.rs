//! CSV export of tables.

use std::fs;
use std::path::Path;

use crate::error::{DoctorError, Result};
use crate::table::Table;

/// Render a table as delimited text: header line, then one line per row.
///
/// Values containing the delimiter, a quote or a line break are quoted.
pub fn to_csv_string(table: &Table, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DoctorError::Csv(csv::Error::from(e.into_error())))?;
    String::from_utf8(bytes).map_err(|e| DoctorError::Config(format!("export produced invalid UTF-8: {}", e)))
}

/// Write a table to a comma-separated file.
pub fn write_csv(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    write_delimited(table, path, b',')
}

/// Write a table to a file with the given delimiter.
pub fn write_delimited(table: &Table, path: impl AsRef<Path>, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    let contents = to_csv_string(table, delimiter)?;
    fs::write(path, contents).map_err(|e| DoctorError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
