//! CSV ingest.
//!
//! This module only turns a delimited file into a [`RawTable`]: header names
//! plus raw string cells. Interpreting those cells (dates, numbers) is the
//! series builder's job.
//!
//! Design goals:
//! - **Lenient reading**: ragged rows are kept (missing cells read as empty)
//! - **No silent loss**: every record reaches the series builder; a record the
//!   reader cannot split fails the load with its line number
//! - **Deterministic behavior** (no hidden randomness)

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ByteRecord;
use tracing::debug;

use crate::domain::{RawRecord, RawTable};
use crate::error::AppError;

/// Load a CSV file from disk.
pub fn load_table(path: &Path) -> Result<RawTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let table = read_table(file)?;
    debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.records.len(),
        "loaded csv"
    );
    Ok(table)
}

/// Read a CSV table from any reader (header row required).
///
/// Cells are decoded lossily, so a cell with invalid UTF-8 still reaches the
/// series builder and is rejected there like any other unreadable value.
/// A record the reader cannot split at all fails the whole load.
pub fn read_table<R: Read>(reader: R) -> Result<RawTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .byte_headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let headers = normalize_headers(&headers);
    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::new(2, "CSV has no header row."));
    }

    let mut records = Vec::new();
    for (idx, result) in reader.byte_records().enumerate() {
        // Fallback only: records() starts after the header, lines are 1-based.
        let fallback_line = idx + 2;

        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(fallback_line);
            AppError::new(3, format!("Line {line}: unreadable CSV record: {e}"))
        })?;
        records.push(RawRecord {
            line: record.position().map(|p| p.line() as usize).unwrap_or(fallback_line),
            fields: record.iter().map(decode_cell).collect(),
        });
    }

    Ok(RawTable::new(headers, records))
}

fn decode_cell(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn normalize_headers(headers: &ByteRecord) -> Vec<String> {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "\u{feff}Order Date"). If we don't strip it, column
    // detection will miss the first column.
    headers
        .iter()
        .map(|name| decode_cell(name).trim().trim_start_matches('\u{feff}').trim().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let csv = "Order Date,Sales,Region\n01/02/2024,10.5,West\n02/02/2024,3,East\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Order Date", "Sales", "Region"]);
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[0].line, 2);
        assert_eq!(table.records[1].fields[1], "3");
    }

    #[test]
    fn strips_bom_and_whitespace_from_headers() {
        let csv = "\u{feff}Order Date , Sales\n01/02/2024,1\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.headers, vec!["Order Date", "Sales"]);
        assert!(table.has_column("Order Date"));
    }

    #[test]
    fn ragged_rows_are_kept() {
        let csv = "Date,Sales\n2024-01-01\n2024-01-02,5,extra\n";
        let t = read_table(csv.as_bytes()).unwrap();
        assert_eq!(t.records.len(), 2);
        assert_eq!(t.value(&t.records[0], "Sales"), None);
        assert_eq!(t.value(&t.records[1], "Sales"), Some("5"));
    }

    #[test]
    fn load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,Revenue").unwrap();
        writeln!(file, "2024-01-01,100").unwrap();
        let table = load_table(file.path()).unwrap();
        assert_eq!(table.records.len(), 1);
    }

    #[test]
    fn invalid_utf8_value_is_kept_for_validation() {
        let mut csv = b"Date,Sales\n2024-01-01,10\n2024-01-02,".to_vec();
        csv.extend_from_slice(&[0xff, 0xfe]);
        csv.extend_from_slice(b"\n2024-01-03,5\n");

        let table = read_table(csv.as_slice()).unwrap();
        assert_eq!(table.records.len(), 3);
        assert_eq!(table.records[1].line, 3);

        let binding = crate::schema::detect_columns(&table.headers).unwrap();
        let err = crate::series::build_weekly_series(&table, &binding).unwrap_err();
        assert!(
            matches!(err, crate::error::ForecastError::InvalidValue { line: 3, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn line_numbers_follow_multiline_records() {
        let csv = "Date,Sales,Note\n2024-01-01,1,\"two\nlines\"\n2024-01-02,2,x\n";
        let table = read_table(csv.as_bytes()).unwrap();
        assert_eq!(table.records[0].line, 2);
        assert_eq!(table.records[1].line, 4);
    }

    #[test]
    fn missing_file_is_exit_code_2() {
        let err = load_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
