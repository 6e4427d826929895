//! The closed set of actions a user can request.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::WardError;

/// A user-facing operation gated by the access policy.
///
/// The string form (`as_str`) is what role tables and the usage log use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    RetrievePatient,
    AddPatient,
    RemovePatient,
    CountVisits,
    ViewNote,
    GenerateStatistics,
}

impl Action {
    /// Every action, in the order a menu presents them.
    pub const ALL: [Action; 6] = [
        Action::RetrievePatient,
        Action::AddPatient,
        Action::RemovePatient,
        Action::CountVisits,
        Action::ViewNote,
        Action::GenerateStatistics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::RetrievePatient => "retrieve_patient",
            Action::AddPatient => "add_patient",
            Action::RemovePatient => "remove_patient",
            Action::CountVisits => "count_visits",
            Action::ViewNote => "view_note",
            Action::GenerateStatistics => "generate_statistics",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = WardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| WardError::InvalidField {
                field: "action".to_string(),
                value: s.to_string(),
            })
    }
}
