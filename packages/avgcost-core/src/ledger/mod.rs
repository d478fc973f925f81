//! Scenario ledger and CSV export.
//!
//! The ledger is an append-only history of computed scenarios, newest first.
//! Records are never edited; the only destructive operation clears the
//! whole history.

mod csv;
mod export;
mod record;

pub use csv::{csv_document, export_csv, export_file_name, UTF8_BOM};
pub use export::{ExportRow, COLUMNS};
pub use record::{ScenarioRecord, ScenarioStatus};

use crate::types::ScenarioInputs;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Ordered history of scenarios, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ScenarioLedger {
    records: VecDeque<ScenarioRecord>,
}

impl ScenarioLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record at the head of the ledger.
    ///
    /// Records that fail [`ScenarioRecord::is_valid`] are dropped and the
    /// ledger is left unchanged. Returns whether the record was stored.
    pub fn append(&mut self, record: ScenarioRecord) -> bool {
        if !record.is_valid() {
            tracing::debug!(status = ?record.status(), "skipping invalid scenario");
            return false;
        }

        self.records.push_front(record);
        tracing::debug!(len = self.records.len(), "scenario appended");
        true
    }

    /// Compute `inputs` now and append the resulting record.
    ///
    /// Returns the stored record, or `None` if it was rejected.
    pub fn record(&mut self, inputs: ScenarioInputs) -> Option<&ScenarioRecord> {
        if self.append(ScenarioRecord::now(inputs)) {
            self.records.front()
        } else {
            None
        }
    }

    /// Remove every record. Returns how many were removed.
    ///
    /// This cannot be undone; asking the user first is up to the caller.
    pub fn clear(&mut self) -> usize {
        let removed = self.records.len();
        self.records.clear();
        tracing::debug!(removed, "scenario ledger cleared");
        removed
    }

    /// Drop records that would not have passed [`ScenarioLedger::append`],
    /// e.g. after loading a hand-edited file. Returns how many were dropped.
    pub fn retain_valid(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(ScenarioRecord::is_valid);
        before - self.records.len()
    }

    /// Records, newest first.
    pub fn records(&self) -> impl Iterator<Item = &ScenarioRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ScenarioRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display-formatted rows for export, newest first.
    pub fn to_export_rows(&self) -> Vec<ExportRow> {
        self.records.iter().map(ScenarioRecord::to_export_row).collect()
    }

    /// The whole ledger as CSV text, without a BOM.
    pub fn to_csv(&self) -> String {
        export_csv(&self.to_export_rows())
    }
}

/// Functional form of [`ScenarioLedger::append`].
pub fn append_scenario(mut ledger: ScenarioLedger, record: ScenarioRecord) -> ScenarioLedger {
    ledger.append(record);
    ledger
}

/// Functional form of [`ScenarioLedger::clear`].
pub fn clear_ledger(mut ledger: ScenarioLedger) -> ScenarioLedger {
    ledger.clear();
    ledger
}
