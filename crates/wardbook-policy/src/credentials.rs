//! Plaintext credential lookup.
//!
//! The credentials file is a CSV with header `username,password,role`.
//! Passwords are compared verbatim; nothing is hashed.

use std::{io, path::Path};

use serde::Deserialize;
use tracing::{info, warn};

use wardbook_contracts::error::{WardError, WardResult};
use wardbook_core::traits::Authenticator;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// In-memory copy of the credentials file.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// Load credentials from `path`.
    ///
    /// A missing file is not an error: it is logged and the store is empty,
    /// so every login fails. Rows that do not have all three columns are
    /// skipped with a warning.
    pub fn load(path: &Path) -> WardResult<Self> {
        let mut reader = match csv::Reader::from_path(path) {
            Ok(reader) => reader,
            Err(e) if is_not_found(&e) => {
                warn!(path = %path.display(), "credential file not found; all logins will fail");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(WardError::ReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })
            }
        };

        let mut credentials = Vec::new();
        for (idx, row) in reader.deserialize::<Credential>().enumerate() {
            match row {
                Ok(credential) => credentials.push(credential),
                Err(e) => warn!(row = idx + 1, error = %e, "skipping malformed credential row"),
            }
        }

        info!(path = %path.display(), users = credentials.len(), "credentials loaded");
        Ok(Self { credentials })
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl Authenticator for CredentialStore {
    fn authenticate(&self, username: &str, password: &str) -> Option<String> {
        self.credentials
            .iter()
            .find(|c| c.username == username && c.password == password)
            .map(|c| c.role.clone())
    }
}

fn is_not_found(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(err) if err.kind() == io::ErrorKind::NotFound)
}
