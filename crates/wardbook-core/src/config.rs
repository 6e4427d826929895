//! Application configuration loaded from TOML.
//!
//! Every field has a default, so an empty document (or no file at all)
//! yields the stock layout:
//!
//! ```toml
//! data_dir = "data"
//! output_dir = "output"
//! patient_file = "Patient_data.csv"
//! notes_file = "Notes.csv"
//! credentials_file = "Credentials.csv"
//! usage_log_file = "usage_log.csv"
//! chart_file = "visit_stats.svg"
//! note_matching = "exact-visit"
//! # policy_file = "policies/hospital.toml"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use wardbook_contracts::{
    error::{WardError, WardResult},
    record::NoteMatching,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory holding the source CSV files.
    pub data_dir: PathBuf,
    /// Directory for generated files (usage log, charts).
    pub output_dir: PathBuf,
    /// Patient/visit CSV, relative to `data_dir`.
    pub patient_file: String,
    /// Notes CSV, relative to `data_dir`.
    pub notes_file: String,
    /// Credentials CSV, relative to `data_dir`.
    pub credentials_file: String,
    /// Usage log CSV, relative to `output_dir`.
    pub usage_log_file: String,
    /// Chart image, relative to `output_dir`. Overwritten on every run.
    pub chart_file: String,
    /// Role table TOML. The built-in table is used when unset.
    pub policy_file: Option<PathBuf>,
    pub note_matching: NoteMatching,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            patient_file: "Patient_data.csv".to_string(),
            notes_file: "Notes.csv".to_string(),
            credentials_file: "Credentials.csv".to_string(),
            usage_log_file: "usage_log.csv".to_string(),
            chart_file: "visit_stats.svg".to_string(),
            policy_file: None,
            note_matching: NoteMatching::default(),
        }
    }
}

impl AppConfig {
    /// Parse `s` as a TOML configuration document.
    ///
    /// Returns `WardError::ConfigError` for malformed TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> WardResult<Self> {
        toml::from_str(s).map_err(|e| WardError::ConfigError {
            reason: format!("failed to parse config TOML: {}", e),
        })
    }

    /// Read and parse the configuration file at `path`.
    pub fn from_file(path: &Path) -> WardResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WardError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Like `from_file`, but a file that does not exist yields the defaults.
    pub fn from_file_or_default(path: &Path) -> WardResult<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn patient_path(&self) -> PathBuf {
        self.data_dir.join(&self.patient_file)
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(&self.notes_file)
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir.join(&self.credentials_file)
    }

    pub fn usage_log_path(&self) -> PathBuf {
        self.output_dir.join(&self.usage_log_file)
    }

    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.chart_file)
    }

    /// Create `data_dir` and `output_dir` if they are missing.
    pub fn ensure_dirs(&self) -> WardResult<()> {
        for dir in [&self.data_dir, &self.output_dir] {
            std::fs::create_dir_all(dir).map_err(|e| WardError::WriteFailed {
                path: dir.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        Ok(())
    }
}
