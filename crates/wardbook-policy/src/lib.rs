//! # wardbook-policy
//!
//! Role-based access control and login for wardbook.
//!
//! ## Overview
//!
//! [`RoleTable`] implements the
//! [`AccessPolicy`](wardbook_core::traits::AccessPolicy) trait from an
//! explicit role → action table declared in TOML. The table is injected into
//! each session at startup; nothing is hardcoded at call sites.
//!
//! [`CredentialStore`] implements
//! [`Authenticator`](wardbook_core::traits::Authenticator) over the
//! `username,password,role` CSV.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use wardbook_policy::{CredentialStore, RoleTable};
//!
//! let roles = RoleTable::builtin()?;
//! let users = CredentialStore::load(Path::new("data/Credentials.csv"))?;
//! ```

pub mod credentials;
pub mod engine;
pub mod rule;

pub use credentials::{Credential, CredentialStore};
pub use engine::RoleTable;
pub use rule::{PolicyConfig, RoleGrant};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use wardbook_contracts::{action::Action, error::WardError};
    use wardbook_core::traits::{AccessPolicy, Authenticator};

    use crate::{CredentialStore, RoleTable};

    // ── Built-in table ────────────────────────────────────────────────────────

    #[test]
    fn test_nurse_may_add_patient() {
        let table = RoleTable::builtin().unwrap();
        assert!(table.permits("nurse", Action::AddPatient));
        assert!(table.permits("clinician", Action::ViewNote));
    }

    #[test]
    fn test_management_may_not_add_patient() {
        let table = RoleTable::builtin().unwrap();
        assert!(!table.permits("management", Action::AddPatient));
        assert!(table.permits("management", Action::GenerateStatistics));
    }

    /// The stock table lets admin generate statistics.
    #[test]
    fn test_admin_permissions() {
        let table = RoleTable::builtin().unwrap();
        assert!(table.permits("admin", Action::CountVisits));
        assert!(table.permits("admin", Action::GenerateStatistics));
        assert!(!table.permits("admin", Action::RetrievePatient));
    }

    #[test]
    fn test_unknown_role_has_empty_set() {
        let table = RoleTable::builtin().unwrap();
        assert!(table.permissions("janitor").is_empty());
        assert!(!table.permits("janitor", Action::CountVisits));
        // Role names are case-sensitive.
        assert!(table.permissions("Nurse").is_empty());
    }

    #[test]
    fn test_builtin_roles() {
        let table = RoleTable::builtin().unwrap();
        assert_eq!(table.roles(), vec!["admin", "clinician", "management", "nurse"]);
    }

    // ── Custom tables ─────────────────────────────────────────────────────────

    #[test]
    fn test_custom_table_replaces_builtin() {
        let toml = r#"
            [[roles]]
            name = "auditor"
            actions = ["count_visits"]

            [[roles]]
            name = "nurse"
            description = "Read-only nurses"
            actions = ["retrieve_patient"]
        "#;

        let table = RoleTable::from_toml_str(toml).unwrap();
        assert!(table.permits("auditor", Action::CountVisits));
        assert!(table.permits("nurse", Action::RetrievePatient));
        assert!(!table.permits("nurse", Action::AddPatient));
        assert!(table.permissions("management").is_empty());
    }

    #[test]
    fn test_empty_table_denies_everything() {
        let table = RoleTable::from_toml_str("roles = []").unwrap();
        for action in Action::ALL {
            assert!(!table.permits("admin", action));
        }
    }

    #[test]
    fn test_unknown_action_is_config_error() {
        let toml = r#"
            [[roles]]
            name = "nurse"
            actions = ["add_patient", "drop_tables"]
        "#;

        match RoleTable::from_toml_str(toml) {
            Err(WardError::ConfigError { reason }) => {
                assert!(reason.contains("drop_tables"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_role_is_config_error() {
        let toml = r#"
            [[roles]]
            name = "nurse"
            actions = []

            [[roles]]
            name = "nurse"
            actions = ["view_note"]
        "#;

        assert!(matches!(
            RoleTable::from_toml_str(toml),
            Err(WardError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_toml_parse_error() {
        match RoleTable::from_toml_str("this is not valid toml ][[[") {
            Err(WardError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse role table TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    // ── Credentials ───────────────────────────────────────────────────────────

    #[test]
    fn test_credentials_authenticate() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Credentials.csv");
        fs::write(
            &path,
            "username,password,role\nnina,pa55,nurse\nmark,m0ney,management\n",
        )
        .unwrap();

        let store = CredentialStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.authenticate("nina", "pa55").as_deref(), Some("nurse"));
        assert_eq!(store.authenticate("mark", "m0ney").as_deref(), Some("management"));
        assert_eq!(store.authenticate("nina", "m0ney"), None);
        assert_eq!(store.authenticate("nobody", "pa55"), None);
    }

    #[test]
    fn test_credentials_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = CredentialStore::load(&tmp.path().join("absent.csv")).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.authenticate("nina", "pa55"), None);
    }

    #[test]
    fn test_credentials_skip_short_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Credentials.csv");
        fs::write(&path, "username,password,role\nbroken,row\nnina,pa55,nurse\n").unwrap();

        let store = CredentialStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.authenticate("nina", "pa55").is_some());
    }
}
