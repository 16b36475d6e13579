//! CSV loader for school spreadsheet exports
//!
//! Column names are trimmed of surrounding whitespace at parse time so
//! downstream role matching is exact-string but tolerant of padded headers.

use crate::error::{Error, Result};
use crate::table::{CellValue, Column, Row, Table};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse a CSV file into a Table
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let reader = BufReader::new(file);
    read_table(reader, path.to_path_buf())
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Table> {
    read_table(content.as_bytes(), source_name.into())
}

fn read_table<R: std::io::Read>(reader: R, path: std::path::PathBuf) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    // Parse headers into columns, trimming incidental padding
    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| Column::new(name.trim().to_string(), i))
        .collect();

    if columns.is_empty() || columns.iter().all(|c| c.name.is_empty()) {
        return Err(Error::Format {
            path,
            message: "no columns found in header row".to_string(),
        });
    }

    // Parse rows
    let mut rows = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        let mut cells: Vec<CellValue> = record.iter().map(CellValue::parse).collect();

        // Pad with empty cells if row is shorter than header
        while cells.len() < columns.len() {
            cells.push(CellValue::Empty);
        }

        // Warn if row is longer than header (truncate)
        if cells.len() > columns.len() {
            eprintln!(
                "Warning: row {} in {} has more cells than columns, truncating",
                row_idx + 1,
                path.display()
            );
            cells.truncate(columns.len());
        }

        rows.push(Row::new(cells));
    }

    Ok(Table {
        columns,
        rows,
        source_path: path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "School No,Name,ASSET Revenue\n101,ABC,10000\n102,XYZ,20000\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].name, "School No");
        assert_eq!(table.columns[1].name, "Name");
        assert_eq!(table.columns[2].name, "ASSET Revenue");

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[0], CellValue::Integer(101));
    }

    #[test]
    fn test_parse_trims_header_padding() {
        let csv = " School No ,  Name\n101,ABC\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.columns[0].name, "School No");
        assert_eq!(table.columns[1].name, "Name");
    }

    #[test]
    fn test_parse_with_empty_cells() {
        let csv = "School No,Name,ASSET Revenue\n101,,10000\n102,XYZ,\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells[1], CellValue::Empty);
        assert_eq!(table.rows[1].cells[2], CellValue::Empty);
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let csv = "School No,Name,ASSET Revenue\n101,ABC\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(table.rows[0].cells.len(), 3);
        assert_eq!(table.rows[0].cells[2], CellValue::Empty);
    }

    #[test]
    fn test_parse_empty_header_is_format_error() {
        let csv = "\n";
        let result = parse_csv_str(csv, "test.csv");
        assert!(matches!(result, Err(Error::Format { .. })));
    }

    #[test]
    fn test_parse_missing_key_column_detected() {
        let csv = "Name,Value\nfoo,100\n";
        let table = parse_csv_str(csv, "test.csv").unwrap();
        assert!(table.require_column("School No").is_err());
    }
}
