//! In-memory implementation of `UsageLog`.
//!
//! Keeps every record in a `Vec` behind `Arc<Mutex<_>>`. Clones share the
//! same storage, so a test can hand one clone to a `Session` and inspect
//! the other.

use std::sync::{Arc, Mutex};

use wardbook_contracts::{
    error::{WardError, WardResult},
    usage::UsageRecord,
};
use wardbook_core::traits::UsageLog;

#[derive(Debug, Clone, Default)]
pub struct InMemoryUsageLog {
    records: Arc<Mutex<Vec<UsageRecord>>>,
}

impl InMemoryUsageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every record appended so far, in order.
    pub fn records(&self) -> Vec<UsageRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl UsageLog for InMemoryUsageLog {
    fn append(&self, record: &UsageRecord) -> WardResult<()> {
        let mut records = self.records.lock().map_err(|e| WardError::WriteFailed {
            path: "<memory>".to_string(),
            reason: format!("usage log lock poisoned: {}", e),
        })?;
        records.push(record.clone());
        Ok(())
    }
}
