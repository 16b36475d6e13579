//! schoolmerge-core: Core library for deduplicating school spreadsheet rows
//!
//! This library provides functionality to:
//! - Parse tabular exports (CSV) into structured tables
//! - Validate that the grouping column ("School No") is present
//! - Collapse rows sharing a school number into one row per school,
//!   summing financial columns and unioning text columns
//! - Configure per-column aggregation roles, loadable from JSON

pub mod config;
pub mod error;
pub mod loader;
pub mod merger;
pub mod table;

pub use config::{ColumnRole, MergeConfig, DEFAULT_KEY_COLUMN, DEFAULT_SUM_COLUMNS};
pub use error::{Error, Result};
pub use loader::{parse_csv, parse_csv_str};
pub use merger::merge;
pub use table::{CellValue, Column, Row, Table};
