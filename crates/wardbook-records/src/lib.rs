//! # wardbook-records
//!
//! CSV-backed repository for patients, visits, and clinical notes.
//!
//! ## Overview
//!
//! [`RecordStore`] loads the patient file (one visit per row) and the notes
//! file into index tables, answers queries against them, and persists
//! mutations: `add_visit` appends one row, `remove_patient` rewrites the
//! file without that patient's rows via a temporary file and a rename.
//!
//! [`normalize_date`] maps the accepted visit-date formats onto ISO
//! `YYYY-MM-DD`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use wardbook_records::RecordStore;
//!
//! let mut store = RecordStore::load("data/Patient_data.csv", "data/Notes.csv")?;
//! let n = store.count_visits_on("05/18/2024");
//! ```

pub mod csv_io;
pub mod date;
pub mod store;

pub use date::{normalize_date, parse_date};
pub use store::RecordStore;

// ── Tests ─────────────────────────────────────────────────────────────────────
