//! Merge engine: collapse rows sharing a group key into one row per group
//!
//! Rows are scanned once in input order. The first sighting of a key creates
//! an accumulator slot; later rows with the same key fold into it. Rows with
//! a blank key become singleton slots of their own. Output preserves
//! first-occurrence order across both kinds of slot, so blank-key rows come
//! out interleaved exactly where they appeared relative to new keys.

use crate::config::{ColumnRole, MergeConfig};
use crate::error::{Error, Result};
use crate::table::{CellValue, Row, Table};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Per-column working state within one group
#[derive(Debug)]
enum CellAcc {
    /// The group key, captured on first sighting
    Key(CellValue),
    /// Running exact sum
    Sum(Decimal),
    /// Distinct non-empty values in first-seen order
    Text(Vec<String>),
    /// First non-empty value wins; later differing values are discarded
    First(CellValue),
}

/// One output row in the making
#[derive(Debug)]
struct Accumulator {
    cells: Vec<CellAcc>,
}

impl Accumulator {
    fn new(roles: &[ColumnRole]) -> Self {
        let cells = roles
            .iter()
            .map(|role| match role {
                ColumnRole::Key => CellAcc::Key(CellValue::Empty),
                ColumnRole::Summable => CellAcc::Sum(Decimal::ZERO),
                ColumnRole::Textual => CellAcc::Text(Vec::new()),
                ColumnRole::Passthrough => CellAcc::First(CellValue::Empty),
            })
            .collect();
        Self { cells }
    }

    /// Fold one input row into this accumulator.
    ///
    /// `row_number` is the 1-based data row, used in error messages.
    fn absorb(&mut self, row: &Row, table: &Table, config: &MergeConfig, row_number: usize) -> Result<()> {
        for (idx, acc) in self.cells.iter_mut().enumerate() {
            let cell = row.get(idx).unwrap_or(&CellValue::Empty);

            match acc {
                CellAcc::Key(key) => {
                    if key.is_empty() {
                        *key = cell.clone();
                    }
                }
                CellAcc::Sum(total) => match cell.as_decimal() {
                    Some(d) => *total += d,
                    None if config.lenient => {}
                    None => {
                        return Err(Error::Aggregation {
                            column: table.columns[idx].name.clone(),
                            value: cell.to_string_value(),
                            row: row_number,
                        });
                    }
                },
                CellAcc::Text(values) => {
                    if !cell.is_empty() {
                        let text = cell.to_string_value();
                        if !values.contains(&text) {
                            values.push(text);
                        }
                    }
                }
                CellAcc::First(current) => {
                    if current.is_empty() && !cell.is_empty() {
                        *current = cell.clone();
                    }
                }
            }
        }
        Ok(())
    }

    /// Emit the finished output row
    fn finish(self, config: &MergeConfig) -> Row {
        let cells = self
            .cells
            .into_iter()
            .map(|acc| match acc {
                CellAcc::Key(key) => key,
                CellAcc::Sum(total) => CellValue::Decimal(total.round_dp(2).normalize()),
                CellAcc::Text(values) => {
                    if values.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(values.join(&config.delimiter))
                    }
                }
                CellAcc::First(value) => value,
            })
            .collect();
        Row::new(cells)
    }
}

/// Merge a table's rows by the configured key column.
///
/// Produces a new table with one row per distinct non-empty key, in
/// first-occurrence order, plus one row per blank-key input row. The input
/// table is not modified and no reference to it is retained.
pub fn merge(table: &Table, config: &MergeConfig) -> Result<Table> {
    // The loader validates this already; re-check so the engine stands alone
    let key_idx = table.require_column(&config.key_column)?;

    let roles: Vec<ColumnRole> = table
        .columns
        .iter()
        .map(|c| config.role_of(&c.name))
        .collect();

    // Ordered slots plus a lookup index for keyed slots. Insertion order of
    // the slot vector is the output order.
    let mut slots: Vec<Accumulator> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (row_idx, row) in table.rows.iter().enumerate() {
        let key = row
            .get(key_idx)
            .map(CellValue::to_string_value)
            .unwrap_or_default();

        let slot_idx = if key.is_empty() {
            // Blank key: a singleton group, never registered for lookup
            slots.push(Accumulator::new(&roles));
            slots.len() - 1
        } else if let Some(&i) = by_key.get(&key) {
            i
        } else {
            slots.push(Accumulator::new(&roles));
            by_key.insert(key, slots.len() - 1);
            slots.len() - 1
        };

        slots[slot_idx].absorb(row, table, config, row_idx + 1)?;
    }

    let rows: Vec<Row> = slots.into_iter().map(|acc| acc.finish(config)).collect();

    Ok(Table {
        columns: table.columns.clone(),
        rows,
        source_path: table.source_path.clone(),
    })
}
