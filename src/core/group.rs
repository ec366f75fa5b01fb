use crate::core::pairing::{validate_pairings, Pairing, PairingError};
use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a group of participants sharing expenses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A set of participants whose expenses are settled together.
///
/// With `pairing_enabled` the group's pairings are applied before debts
/// are simplified, so each pair settles as a single entity. With it off,
/// the configured pairings are kept but ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub members: Vec<ParticipantId>,
    #[serde(default)]
    pub pairings: Vec<Pairing>,
    #[serde(default)]
    pub pairing_enabled: bool,
}

impl Group {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        members: Vec<ParticipantId>,
    ) -> Self {
        Self {
            id: GroupId::new(id),
            name: name.into(),
            members,
            pairings: Vec::new(),
            pairing_enabled: false,
        }
    }

    /// Add a pairing and switch pairing mode on.
    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairings.push(pairing);
        self.pairing_enabled = true;
        self
    }

    pub fn is_member(&self, id: &ParticipantId) -> bool {
        self.members.contains(id)
    }

    /// Pairings to apply when settling this group.
    pub fn active_pairings(&self) -> &[Pairing] {
        if self.pairing_enabled {
            &self.pairings
        } else {
            &[]
        }
    }

    /// Pairings must be disjoint and only name members of the group.
    pub fn validate(&self) -> Result<(), PairingError> {
        validate_pairings(&self.pairings)?;
        for pairing in &self.pairings {
            for member in pairing.members() {
                if !self.is_member(member) {
                    return Err(PairingError::NotGroupMember(member.clone()));
                }
            }
        }
        Ok(())
    }
}
