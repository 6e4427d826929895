//! # wardbook-audit
//!
//! Append-only usage log for wardbook sessions.
//!
//! Every action a session performs is recorded as one row:
//! `Username,Role,Action,Login Time,Action Time`. [`CsvUsageLog`] writes
//! those rows to a CSV file, creating it (with a header) on first use.
//! [`InMemoryUsageLog`] keeps them in memory for tests and embedding.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wardbook_audit::CsvUsageLog;
//!
//! let log = CsvUsageLog::new("output/usage_log.csv");
//! let session = Session::new("nina", "nurse", Box::new(roles), Box::new(log));
//! ```

pub mod csv_log;
pub mod memory;

pub use csv_log::CsvUsageLog;
pub use memory::InMemoryUsageLog;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use wardbook_contracts::usage::UsageRecord;
    use wardbook_core::traits::UsageLog;

    use super::{CsvUsageLog, InMemoryUsageLog};

    fn record(action: &str, minute: u32) -> UsageRecord {
        let day = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        UsageRecord {
            username: "nina".to_string(),
            role: "nurse".to_string(),
            action: action.to_string(),
            login_time: day.and_hms_opt(9, 0, 0).unwrap(),
            action_time: day.and_hms_opt(9, minute, 30).unwrap(),
        }
    }

    /// The first append creates the file with a header; later appends add
    /// rows only.
    #[test]
    fn test_csv_header_written_once() {
        let tmp = tempfile::tempdir().unwrap();
        let log = CsvUsageLog::new(tmp.path().join("usage_log.csv"));

        log.append(&record("count_visits", 1)).unwrap();
        log.append(&record("view_note", 2)).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Username,Role,Action,Login Time,Action Time");
        assert_eq!(lines[1], "nina,nurse,count_visits,2024-05-18 09:00:00,2024-05-18 09:01:30");
        assert!(lines[2].starts_with("nina,nurse,view_note,"));
    }

    /// Appending to an existing log keeps earlier rows intact.
    #[test]
    fn test_csv_appends_across_writers() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("usage_log.csv");

        CsvUsageLog::new(&path).append(&record("add_patient", 1)).unwrap();
        CsvUsageLog::new(&path).append(&record("exit", 5)).unwrap();

        let records = CsvUsageLog::new(&path).read_records().unwrap();
        assert_eq!(records, vec![record("add_patient", 1), record("exit", 5)]);
    }

    #[test]
    fn test_csv_read_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let log = CsvUsageLog::new(tmp.path().join("never_written.csv"));
        assert!(log.read_records().unwrap().is_empty());
    }

    #[test]
    fn test_csv_write_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let log = CsvUsageLog::new(tmp.path().join("no/such/dir/usage_log.csv"));
        assert!(matches!(
            log.append(&record("count_visits", 1)),
            Err(wardbook_contracts::error::WardError::WriteFailed { .. })
        ));
    }

    #[test]
    fn test_memory_log_shares_storage_between_clones() {
        let log = InMemoryUsageLog::new();
        let handle = log.clone();

        log.append(&record("count_visits", 1)).unwrap();
        log.append(&record("exit", 2)).unwrap();

        let actions: Vec<String> = handle.records().into_iter().map(|r| r.action).collect();
        assert_eq!(actions, vec!["count_visits", "exit"]);
    }
}
