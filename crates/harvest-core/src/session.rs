//! Per-surface capture session
//!
//! One session owns everything a capture needs: the payload store fed by
//! the interception adapter and the best table produced so far. Explicitly
//! created and dropped by the embedder; nothing here is a process-wide
//! singleton.

use crate::assemble;
use crate::capture::{CaptureRecord, CaptureStore};
use crate::error::Result;
use crate::table::Table;
use crate::traverse::{self, GridSurface, SweepStats, TraversalConfig};

/// Capture state for one target surface
#[derive(Debug, Default)]
pub struct CaptureSession {
    store: CaptureStore,
    table: Option<Table>,
}

impl CaptureSession {
    /// Create a session with the default payload capacity
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with an explicit payload capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            store: CaptureStore::with_capacity(capacity),
            table: None,
        }
    }

    /// The payload store the interception adapter appends into
    pub fn store(&self) -> &CaptureStore {
        &self.store
    }

    /// Record one captured payload
    pub fn record(&self, record: CaptureRecord) {
        self.store.append(record);
    }

    /// The best table captured so far, if any
    pub fn latest_table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Offer a freshly captured table
    ///
    /// Replacement is monotonic: the held table is replaced only when the
    /// new one has at least as many rows, so a degraded capture never
    /// regresses the result. Returns whether the offer was installed.
    pub fn install(&mut self, table: Table) -> bool {
        let held_rows = self.table.as_ref().map_or(0, Table::row_count);
        if table.row_count() >= held_rows {
            self.table = Some(table);
            true
        } else {
            false
        }
    }

    /// Run the API path over a snapshot of the captured payloads
    ///
    /// On success the result is offered to [`CaptureSession::install`];
    /// on failure the held table is untouched.
    pub fn assemble_from_captures(&mut self) -> Result<Table> {
        let snapshot = self.store.snapshot();
        let table = assemble::assemble(&snapshot)?;
        self.install(table.clone());
        Ok(table)
    }

    /// Run the DOM path: a full grid traversal
    pub fn run_traversal<S: GridSurface>(
        &mut self,
        surface: &mut S,
        config: &TraversalConfig,
    ) -> Result<(Table, SweepStats)> {
        let (table, stats) = traverse::traverse(surface, config)?;
        self.install(table.clone());
        Ok((table, stats))
    }

    /// Run the DOM fallback: extract only what is currently visible
    pub fn run_single_pass<S: GridSurface>(&mut self, surface: &mut S) -> Result<Table> {
        let table = traverse::single_pass(surface)?;
        self.install(table.clone());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table_with_rows(n: usize) -> Table {
        let mut table = Table::new(vec!["a".into()]);
        for i in 0..n {
            table.push_row(vec![i.to_string()]);
        }
        table
    }

    #[test]
    fn test_install_accepts_equal_or_larger() {
        let mut session = CaptureSession::new();
        assert!(session.install(table_with_rows(3)));
        assert!(session.install(table_with_rows(3)));
        assert!(session.install(table_with_rows(5)));
        assert_eq!(session.latest_table().unwrap().row_count(), 5);
    }

    #[test]
    fn test_install_rejects_smaller() {
        let mut session = CaptureSession::new();
        assert!(session.install(table_with_rows(5)));
        assert!(!session.install(table_with_rows(2)));
        assert_eq!(session.latest_table().unwrap().row_count(), 5);
    }

    #[test]
    fn test_failed_assembly_leaves_table_untouched() {
        let mut session = CaptureSession::new();
        session.install(table_with_rows(4));
        // Nothing table-shaped buffered
        session.record(CaptureRecord::new("u", "GET", json!({ "ok": true }), false));
        assert!(session.assemble_from_captures().is_err());
        assert_eq!(session.latest_table().unwrap().row_count(), 4);
    }

    #[test]
    fn test_assemble_from_captures_installs_result() {
        let mut session = CaptureSession::new();
        session.record(CaptureRecord::new(
            "https://api.test/items",
            "GET",
            json!({ "items": [
                { "id": 1, "name": "A" },
                { "id": 2, "name": "B" }
            ] }),
            true,
        ));
        let table = session.assemble_from_captures().unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(session.latest_table().unwrap().row_count(), 2);
    }
}
