//! CSV-file implementation of `UsageLog`.
//!
//! The file is opened in append mode for every record and the header row is
//! written only when the file is new or empty. Existing rows are never
//! rewritten.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDateTime;
use tracing::debug;

use wardbook_contracts::{
    error::{WardError, WardResult},
    usage::{UsageRecord, TIMESTAMP_FORMAT},
};
use wardbook_core::traits::UsageLog;

/// Column names of the usage log, in file order.
pub const HEADER: [&str; 5] = ["Username", "Role", "Action", "Login Time", "Action Time"];

/// Appends usage records to a CSV file.
pub struct CsvUsageLog {
    path: PathBuf,
    // Serializes the header check and the append across threads.
    lock: Mutex<()>,
}

impl CsvUsageLog {
    /// Create a writer for `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back from the file.
    ///
    /// A file that does not exist yet holds no records.
    pub fn read_records(&self) -> WardResult<Vec<UsageRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let read_err = |reason: String| WardError::ReadFailed {
            path: self.path.display().to_string(),
            reason,
        };

        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| read_err(e.to_string()))?;
        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| read_err(e.to_string()))?;
            let field = |i: usize| row.get(i).unwrap_or_default().to_string();
            let time = |i: usize| {
                NaiveDateTime::parse_from_str(row.get(i).unwrap_or_default(), TIMESTAMP_FORMAT)
                    .map_err(|e| read_err(format!("bad timestamp in column {}: {}", HEADER[i], e)))
            };
            records.push(UsageRecord {
                username: field(0),
                role: field(1),
                action: field(2),
                login_time: time(3)?,
                action_time: time(4)?,
            });
        }
        Ok(records)
    }
}

impl UsageLog for CsvUsageLog {
    fn append(&self, record: &UsageRecord) -> WardResult<()> {
        let write_err = |reason: String| WardError::WriteFailed {
            path: self.path.display().to_string(),
            reason,
        };

        let _guard = self
            .lock
            .lock()
            .map_err(|e| write_err(format!("usage log lock poisoned: {}", e)))?;

        let needs_header = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| write_err(e.to_string()))?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if needs_header {
            writer.write_record(HEADER).map_err(|e| write_err(e.to_string()))?;
        }

        let login = record.login_time.format(TIMESTAMP_FORMAT).to_string();
        let acted = record.action_time.format(TIMESTAMP_FORMAT).to_string();
        writer
            .write_record([
                record.username.as_str(),
                record.role.as_str(),
                record.action.as_str(),
                login.as_str(),
                acted.as_str(),
            ])
            .map_err(|e| write_err(e.to_string()))?;
        writer.flush().map_err(|e| write_err(e.to_string()))?;

        debug!(
            path = %self.path.display(),
            username = %record.username,
            action = %record.action,
            "usage recorded"
        );
        Ok(())
    }
}
