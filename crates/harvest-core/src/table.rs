//! Core table types shared by the DOM and API capture paths

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A finalized table: ordered headers and positionally aligned rows
///
/// Every row holds exactly `headers.len()` cells; a missing value is an
/// empty string, never absent. A Table is replaced wholesale, never mutated
/// in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Column labels, in display order
    pub headers: Vec<String>,
    /// Row data, each row aligned to `headers`
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a new empty table with the given headers
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find a column's index by header label
    pub fn find_column(&self, label: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == label)
    }

    /// Push a row, padding or truncating to the header width
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push(cells);
    }
}

/// Stable per-row identity used to merge partial observations
///
/// Distinct from the row's on-screen position, which changes as the grid
/// virtualizes.
pub type RowKey = String;

/// Stable per-column identifier, independent of display order and label
pub type FieldId = String;

/// A column as reported by the grid surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Stable identifier used to key cells
    pub field_id: FieldId,
    /// Human-readable header label
    pub label: String,
}

impl ColumnSpec {
    pub fn new(field_id: impl Into<FieldId>, label: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            label: label.into(),
        }
    }
}

/// One capture of one row from one extraction pass
///
/// May be partial: a pass only sees the columns currently scrolled into
/// view. Observations are folded into an accumulator keyed by `key` and
/// discarded once the final Table is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowObservation {
    /// Stable row identity
    pub key: RowKey,
    /// Position of the row when first seen, used for final ordering
    pub original_index: usize,
    /// Observed cell values, keyed by field id
    pub cells: HashMap<FieldId, String>,
}

impl RowObservation {
    /// Create a new observation
    pub fn new(key: impl Into<RowKey>, original_index: usize) -> Self {
        Self {
            key: key.into(),
            original_index,
            cells: HashMap::new(),
        }
    }

    /// Set a cell value
    pub fn set(&mut self, field_id: impl Into<FieldId>, value: impl Into<String>) -> &mut Self {
        self.cells.insert(field_id.into(), value.into());
        self
    }

    /// Get a cell value by field id
    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.cells.get(field_id).map(String::as_str)
    }
}
