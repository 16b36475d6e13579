//! Merge configuration: the grouping column and per-column aggregation roles

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default grouping column for school exports
pub const DEFAULT_KEY_COLUMN: &str = "School No";

/// Financial columns aggregated by sum in the stock configuration
pub const DEFAULT_SUM_COLUMNS: &[&str] = &[
    "Total Order Value (Exclusive GST)",
    "Total Order Value (Inclusive GST)",
    "ASSET Revenue",
    "ASSETStudents",
    "CARES Revenue",
    "CARESStudents",
    "Mindspark Revenue",
    "MindsparkStudents",
];

/// How a column's values are combined within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// The grouping column itself; never aggregated
    Key,
    /// Numeric; aggregated by exact arithmetic sum
    Summable,
    /// Distinct non-empty values joined with the configured delimiter
    Textual,
    /// First non-empty value wins
    Passthrough,
}

/// Configuration for one merge invocation
///
/// An injected value, never process-global: independent configurations can
/// run side by side without interference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Name of the grouping column
    pub key_column: String,
    /// Columns aggregated by sum
    pub sum_columns: Vec<String>,
    /// Columns aggregated by ordered text union
    pub text_columns: Vec<String>,
    /// Separator used when joining text unions
    pub delimiter: String,
    /// When true, non-numeric cells in sum columns count as zero instead
    /// of failing the merge. Off by default: silently zeroing financial
    /// data is a correctness risk.
    pub lenient: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            sum_columns: DEFAULT_SUM_COLUMNS.iter().map(|s| s.to_string()).collect(),
            text_columns: Vec::new(),
            delimiter: "; ".to_string(),
            lenient: false,
        }
    }
}

impl MergeConfig {
    /// Resolve the role of a column by name.
    ///
    /// The key column is never aggregated; any column not listed as
    /// Summable or Textual defaults to Passthrough.
    pub fn role_of(&self, column: &str) -> ColumnRole {
        if column == self.key_column {
            ColumnRole::Key
        } else if self.sum_columns.iter().any(|c| c == column) {
            ColumnRole::Summable
        } else if self.text_columns.iter().any(|c| c == column) {
            ColumnRole::Textual
        } else {
            ColumnRole::Passthrough
        }
    }

    /// Load a configuration from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the configuration to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roles() {
        let config = MergeConfig::default();

        assert_eq!(config.role_of("School No"), ColumnRole::Key);
        assert_eq!(config.role_of("ASSET Revenue"), ColumnRole::Summable);
        assert_eq!(config.role_of("CARESStudents"), ColumnRole::Summable);
        assert_eq!(config.role_of("Name"), ColumnRole::Passthrough);
    }

    #[test]
    fn test_text_columns_resolve_textual() {
        let mut config = MergeConfig::default();
        config.text_columns.push("Name".to_string());

        assert_eq!(config.role_of("Name"), ColumnRole::Textual);
    }

    #[test]
    fn test_key_column_beats_sum_listing() {
        let mut config = MergeConfig::default();
        config.sum_columns.push("School No".to_string());

        // The key column is never aggregated, even if listed
        assert_eq!(config.role_of("School No"), ColumnRole::Key);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = MergeConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: MergeConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.key_column, config.key_column);
        assert_eq!(back.sum_columns, config.sum_columns);
        assert_eq!(back.delimiter, "; ");
        assert!(!back.lenient);
    }
}
