//! Merging of partial row observations across extraction passes
//!
//! Virtualization means each pass sees a different row/column window, so
//! the same row is observed several times with different column subsets.
//! The accumulator unions those views: the first non-empty value captured
//! for a cell wins, later passes only fill gaps.

use crate::table::{ColumnSpec, RowKey, RowObservation, Table};
use std::collections::HashMap;

/// Accumulates row observations across passes, keyed by stable row identity
#[derive(Debug, Default)]
pub struct RowAccumulator {
    rows: HashMap<RowKey, RowObservation>,
}

impl RowAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct rows observed so far
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows have been observed yet
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fold one extraction pass into the accumulator
    ///
    /// A new key is inserted wholesale. For an existing key, an incoming
    /// value lands only in cells that are still missing or empty; the
    /// first-seen `original_index` is kept. An empty cell value is
    /// indistinguishable from a not-yet-observed cell, so a genuinely
    /// empty cell may be filled by a later pass.
    pub fn absorb(&mut self, pass: impl IntoIterator<Item = RowObservation>) {
        for incoming in pass {
            match self.rows.get_mut(&incoming.key) {
                None => {
                    self.rows.insert(incoming.key.clone(), incoming);
                }
                Some(existing) => {
                    for (field_id, value) in incoming.cells {
                        if value.is_empty() {
                            continue;
                        }
                        let slot = existing.cells.entry(field_id).or_default();
                        if slot.is_empty() {
                            *slot = value;
                        }
                    }
                }
            }
        }
    }

    /// Finalize into a Table, ordered by first-seen row position
    ///
    /// Each row is projected onto `columns`: cell lookup by field id,
    /// missing fields become empty strings, headers take the column labels.
    pub fn into_table(self, columns: &[ColumnSpec]) -> Table {
        let mut observations: Vec<RowObservation> = self.rows.into_values().collect();
        observations.sort_by_key(|obs| obs.original_index);

        let headers = columns.iter().map(|c| c.label.clone()).collect();
        let mut table = Table::new(headers);
        for obs in observations {
            let cells = columns
                .iter()
                .map(|c| obs.get(&c.field_id).unwrap_or_default().to_string())
                .collect();
            table.push_row(cells);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(key: &str, index: usize, cells: &[(&str, &str)]) -> RowObservation {
        let mut o = RowObservation::new(key, index);
        for (f, v) in cells {
            o.set(*f, *v);
        }
        o
    }

    fn columns(ids: &[&str]) -> Vec<ColumnSpec> {
        ids.iter().map(|id| ColumnSpec::new(*id, *id)).collect()
    }

    #[test]
    fn test_new_key_inserted_wholesale() {
        let mut acc = RowAccumulator::new();
        acc.absorb(vec![obs("r1", 0, &[("f1", "x")])]);
        assert_eq!(acc.len(), 1);
    }

    #[test]
    fn test_first_non_empty_value_wins() {
        let mut acc = RowAccumulator::new();
        acc.absorb(vec![obs("r1", 0, &[("f1", "x")])]);
        acc.absorb(vec![obs("r1", 0, &[("f1", "y"), ("f2", "z")])]);

        let table = acc.into_table(&columns(&["f1", "f2"]));
        assert_eq!(table.rows, vec![vec!["x", "z"]]);
    }

    #[test]
    fn test_empty_incoming_value_never_clears() {
        let mut acc = RowAccumulator::new();
        acc.absorb(vec![obs("r1", 0, &[("f1", "x")])]);
        acc.absorb(vec![obs("r1", 0, &[("f1", "")])]);

        let table = acc.into_table(&columns(&["f1"]));
        assert_eq!(table.rows, vec![vec!["x"]]);
    }

    #[test]
    fn test_empty_slot_filled_by_later_pass() {
        let mut acc = RowAccumulator::new();
        acc.absorb(vec![obs("r1", 0, &[("f1", "")])]);
        acc.absorb(vec![obs("r1", 0, &[("f1", "late")])]);

        let table = acc.into_table(&columns(&["f1"]));
        assert_eq!(table.rows, vec![vec!["late"]]);
    }

    #[test]
    fn test_original_index_of_first_observation_is_kept() {
        let mut acc = RowAccumulator::new();
        acc.absorb(vec![obs("r1", 5, &[("f1", "x")])]);
        acc.absorb(vec![
            // Re-observed at a different render position
            obs("r1", 0, &[("f2", "y")]),
            obs("r2", 1, &[("f1", "a"), ("f2", "b")]),
        ]);

        let table = acc.into_table(&columns(&["f1", "f2"]));
        // r2 (index 1) sorts before r1 (index 5)
        assert_eq!(table.rows, vec![vec!["a", "b"], vec!["x", "y"]]);
    }

    #[test]
    fn test_projection_fills_missing_fields_with_empty() {
        let mut acc = RowAccumulator::new();
        acc.absorb(vec![obs("r1", 0, &[("f1", "x")])]);

        let table = acc.into_table(&columns(&["f1", "f2", "f3"]));
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows, vec![vec!["x", "", ""]]);
    }

    #[test]
    fn test_headers_take_column_labels() {
        let mut acc = RowAccumulator::new();
        acc.absorb(vec![obs("r1", 0, &[("col_a", "1")])]);

        let cols = vec![ColumnSpec::new("col_a", "Column A")];
        let table = acc.into_table(&cols);
        assert_eq!(table.headers, vec!["Column A"]);
    }
}
