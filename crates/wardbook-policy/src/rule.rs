//! Role table schema.
//!
//! A `PolicyConfig` is deserialized from TOML and holds one `RoleGrant` per
//! role. Action names are validated when the engine is built, not here.

use serde::{Deserialize, Serialize};

/// The actions granted to one role.
///
/// Example in TOML:
/// ```toml
/// [[roles]]
/// name = "management"
/// description = "Aggregate reporting only"
/// actions = ["generate_statistics"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrant {
    /// Role name as it appears in the credentials file (case-sensitive).
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Action names (`Action::as_str` form). May be empty.
    #[serde(default)]
    pub actions: Vec<String>,
}

/// The top-level structure deserialized from a role table file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub roles: Vec<RoleGrant>,
}
