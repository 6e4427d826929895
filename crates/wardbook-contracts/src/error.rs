//! Error types shared by every wardbook crate.
//!
//! Only failures the caller must act on are errors. A missing source CSV or
//! a malformed row is logged and skipped by the repository, and an unknown
//! patient or date is reported as `None`, so neither appears here.

use thiserror::Error;

/// The unified error type for wardbook.
#[derive(Debug, Error)]
pub enum WardError {
    /// The session's role does not grant the requested action.
    #[error("role '{role}' is not permitted to perform '{action}'")]
    PermissionDenied { role: String, action: String },

    /// Username/password did not match any credential row.
    ///
    /// Deliberately carries no detail about which half was wrong.
    #[error("invalid username or password")]
    AuthenticationFailed,

    /// A caller-supplied value cannot be stored or interpreted.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidField { field: String, value: String },

    /// A file exists but could not be read or parsed as a whole.
    #[error("failed to read '{path}': {reason}")]
    ReadFailed { path: String, reason: String },

    /// A backing file could not be written.
    ///
    /// In-memory state may already reflect the mutation when this is
    /// returned; the repository does not roll back.
    #[error("failed to write '{path}': {reason}")]
    WriteFailed { path: String, reason: String },

    /// A configuration or role-table document is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The chart backend failed while drawing or saving.
    #[error("chart rendering failed: {reason}")]
    ChartFailed { reason: String },
}

/// Convenience alias used throughout the wardbook crates.
pub type WardResult<T> = Result<T, WardError>;
