//! Core table types for representing school spreadsheet data

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// A parsed table: an ordered header plus rows aligned with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column definitions, in header order
    pub columns: Vec<Column>,
    /// Row data
    pub rows: Vec<Row>,
    /// Source file path (or a synthetic name for in-memory tables)
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(source_path: PathBuf) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Fail with a schema error unless the named column exists.
    ///
    /// Returns the column's index on success.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.find_column(name)
            .map(|c| c.index)
            .ok_or_else(|| Error::Schema {
                column: name.to_string(),
            })
    }
}

/// A column definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, trimmed of surrounding whitespace
    pub name: String,
    /// Column index (0-based)
    pub index: usize,
}

impl Column {
    /// Create a new column
    pub fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }
}

/// A row of data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Cell values, positionally aligned with the table's columns
    pub cells: Vec<CellValue>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.cells.get(index)
    }
}

/// A cell value with type detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Integer value
    Integer(i64),
    /// Exact decimal value
    Decimal(Decimal),
    /// String value
    Text(String),
    /// Empty/null cell
    Empty,
}

impl CellValue {
    /// Parse a string into a CellValue, detecting the type
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return CellValue::Empty;
        }

        // Try parsing as integer first
        if let Ok(i) = trimmed.parse::<i64>() {
            return CellValue::Integer(i);
        }

        // Then as an exact decimal
        if let Ok(d) = Decimal::from_str(trimmed) {
            return CellValue::Decimal(d);
        }

        // Otherwise, keep as string
        CellValue::Text(trimmed.to_string())
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Convert to a display string
    pub fn to_string_value(&self) -> String {
        match self {
            CellValue::Integer(i) => i.to_string(),
            CellValue::Decimal(d) => d.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Empty => String::new(),
        }
    }

    /// Coerce to a decimal for summing.
    ///
    /// Text cells go through currency cleanup first: thousands separators,
    /// currency markers, and other stray characters are stripped so values
    /// like `"INR 1,200.50"` sum as `1200.50`. Returns `None` when nothing
    /// numeric remains.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Integer(i) => Some(Decimal::from(*i)),
            CellValue::Decimal(d) => Some(*d),
            CellValue::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                if cleaned.is_empty() {
                    return None;
                }
                Decimal::from_str(&cleaned).ok()
            }
            CellValue::Empty => Some(Decimal::ZERO),
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Decimal(d) => write!(f, "{}", d),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Empty => write!(f, ""),
        }
    }
}
