//! CSV ingest.
//!
//! This module turns a delimited text file into an in-memory table of string
//! cells. No typing happens here: schema resolution and cleaning decide what
//! each column means. Rows that fail to parse at the CSV level are skipped
//! and counted, never silently dropped.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;

/// A raw, untyped table: trimmed headers plus rows of string cells.
///
/// Every row has exactly `headers.len()` cells (short rows are padded with
/// empty strings, long rows truncated).
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Case-insensitive lookup of a column index by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }
}

/// Ingest output: the table plus row-level accounting.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: RawTable,
    pub rows_read: usize,
    pub rows_skipped: usize,
}

/// Load a CSV file into a [`RawTable`].
pub fn load_csv(path: &Path) -> Result<IngestedTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_table(file)
}

/// Read CSV from any reader (used directly by tests).
pub fn read_table<R: std::io::Read>(reader: R) -> Result<IngestedTable, AppError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .iter()
        .map(normalize_header_name)
        .collect();

    if headers.is_empty() {
        return Err(AppError::schema("CSV has no header row."));
    }

    let width = headers.len();
    let mut rows = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_skipped = 0usize;

    for result in csv_reader.records() {
        rows_read += 1;
        let record = match result {
            Ok(r) => r,
            Err(_) => {
                rows_skipped += 1;
                continue;
            }
        };

        let mut cells: Vec<String> = record.iter().map(|s| s.trim().to_string()).collect();
        cells.resize(width, String::new());
        cells.truncate(width);
        rows.push(cells);
    }

    Ok(IngestedTable {
        table: RawTable { headers, rows },
        rows_read,
        rows_skipped,
    })
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header (e.g. "﻿Order Date"). If we don't strip it, schema
    // resolution will incorrectly report a missing column.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let csv = "Order Date,Sales,Category\n2024-01-05,10.5,Tech\n2024-01-06,3.0,Office\n";
        let ingested = read_table(csv.as_bytes()).unwrap();
        assert_eq!(ingested.table.headers, vec!["Order Date", "Sales", "Category"]);
        assert_eq!(ingested.rows_read, 2);
        assert_eq!(ingested.rows_skipped, 0);
        assert_eq!(ingested.table.rows[0][1], "10.5");
    }

    #[test]
    fn strips_bom_from_first_header() {
        let csv = "\u{feff}Order Date,Sales\n2024-01-05,10\n";
        let ingested = read_table(csv.as_bytes()).unwrap();
        assert_eq!(ingested.table.headers[0], "Order Date");
        assert!(ingested.table.column_index("order date").is_some());
    }

    #[test]
    fn pads_short_rows_to_header_width() {
        let csv = "a,b,c\n1,2\n";
        let ingested = read_table(csv.as_bytes()).unwrap();
        assert_eq!(ingested.table.rows[0], vec!["1", "2", ""]);
    }
}
