//! TOML-driven role table.
//!
//! `RoleTable` is built once from a `PolicyConfig` and implements the
//! `AccessPolicy` trait from wardbook-core. Lookups are pure; a role absent
//! from the table maps to the empty capability set.

use std::{collections::HashMap, path::Path};

use tracing::debug;

use wardbook_contracts::{
    action::Action,
    capability::CapabilitySet,
    error::{WardError, WardResult},
};
use wardbook_core::traits::AccessPolicy;

use crate::rule::PolicyConfig;

/// The role table shipped with wardbook.
pub const DEFAULT_POLICY: &str = include_str!("../policies/hospital.toml");

/// An `AccessPolicy` backed by an explicit role → capability table.
///
/// ```rust,ignore
/// use wardbook_policy::RoleTable;
///
/// let table = RoleTable::from_file(Path::new("policies/hospital.toml"))?;
/// assert!(table.permits("nurse", Action::AddPatient));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    roles: HashMap<String, CapabilitySet>,
}

impl RoleTable {
    /// Build a table from an already-deserialized configuration.
    ///
    /// Returns `WardError::ConfigError` if a role is declared twice or an
    /// action name is not one of the known actions.
    pub fn from_config(config: PolicyConfig) -> WardResult<Self> {
        let mut roles = HashMap::new();

        for grant in config.roles {
            let mut caps = CapabilitySet::default();
            for name in &grant.actions {
                let action: Action = name.parse().map_err(|_| WardError::ConfigError {
                    reason: format!("role '{}' grants unknown action '{}'", grant.name, name),
                })?;
                caps.grant(action.into());
            }

            debug!(role = %grant.name, actions = grant.actions.len(), "loaded role");

            if roles.insert(grant.name.clone(), caps).is_some() {
                return Err(WardError::ConfigError {
                    reason: format!("role '{}' is declared more than once", grant.name),
                });
            }
        }

        Ok(Self { roles })
    }

    /// Parse `s` as TOML and build a `RoleTable`.
    pub fn from_toml_str(s: &str) -> WardResult<Self> {
        let config: PolicyConfig = toml::from_str(s).map_err(|e| WardError::ConfigError {
            reason: format!("failed to parse role table TOML: {}", e),
        })?;
        Self::from_config(config)
    }

    /// Read the file at `path` and parse it as a role table.
    pub fn from_file(path: &Path) -> WardResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| WardError::ConfigError {
            reason: format!("failed to read role table '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The stock table (`policies/hospital.toml`).
    pub fn builtin() -> WardResult<Self> {
        Self::from_toml_str(DEFAULT_POLICY)
    }

    /// Names of every role in the table, sorted.
    pub fn roles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl AccessPolicy for RoleTable {
    fn permissions(&self, role: &str) -> CapabilitySet {
        self.roles.get(role).cloned().unwrap_or_default()
    }

    fn permits(&self, role: &str, action: Action) -> bool {
        self.roles.get(role).is_some_and(|caps| caps.permits(action))
    }
}
