//! Capability tokens granted to a role.
//!
//! A role may perform an action only if its capability set contains the
//! action's capability. Sets are built once from the role table and never
//! change for the lifetime of a session.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// An opaque capability token, named after the action it unlocks
/// (e.g. "count_visits").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability(pub String);

impl Capability {
    /// Construct a capability from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<Action> for Capability {
    fn from(action: Action) -> Self {
        Self::new(action.as_str())
    }
}

/// The full set of capabilities granted to one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    inner: HashSet<Capability>,
}

impl CapabilitySet {
    /// Grant a capability to this set.
    pub fn grant(&mut self, capability: Capability) {
        self.inner.insert(capability);
    }

    /// Return true if the set contains the given capability.
    pub fn has(&self, capability: &Capability) -> bool {
        self.inner.contains(capability)
    }

    /// Return true if the set unlocks `action`.
    pub fn permits(&self, action: Action) -> bool {
        self.has(&Capability::from(action))
    }

    /// Return an iterator over all granted capabilities.
    pub fn all(&self) -> impl Iterator<Item = &Capability> {
        self.inner.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl FromIterator<Action> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        let mut set = Self::default();
        for action in iter {
            set.grant(action.into());
        }
        set
    }
}
