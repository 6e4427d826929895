//! Trait seams between a session and the components it is wired to.
//!
//! - `AccessPolicy`  maps a role to the actions it may perform
//! - `Authenticator` resolves a username/password pair to a role
//! - `UsageLog`      records every action a session performs
//!
//! Implementations live in `wardbook-policy` and `wardbook-audit`; tests
//! substitute in-memory mocks.

use wardbook_contracts::{
    action::Action,
    capability::CapabilitySet,
    error::WardResult,
    usage::UsageRecord,
};

/// A role → capability table.
///
/// Implementations must be pure: no I/O, no state changes on lookup.
pub trait AccessPolicy: Send + Sync {
    /// Capabilities granted to `role`. Unknown roles get an empty set.
    fn permissions(&self, role: &str) -> CapabilitySet;

    /// Return true if `role` may perform `action`.
    fn permits(&self, role: &str, action: Action) -> bool {
        self.permissions(role).permits(action)
    }
}

/// Credential lookup used at login.
pub trait Authenticator {
    /// Return the user's role when the credentials match, `None` otherwise.
    fn authenticate(&self, username: &str, password: &str) -> Option<String>;
}

/// Append-only sink for usage records.
pub trait UsageLog: Send + Sync {
    /// Append one record. Records are never modified or removed afterwards.
    fn append(&self, record: &UsageRecord) -> WardResult<()>;
}
