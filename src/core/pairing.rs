use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors arising from pairing configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PairingError {
    #[error("participant {0} cannot be paired with itself")]
    SelfPairing(ParticipantId),
    #[error("representative {representative} is not a member of pairing {member_a}/{member_b}")]
    RepresentativeNotMember {
        representative: ParticipantId,
        member_a: ParticipantId,
        member_b: ParticipantId,
    },
    #[error("participant {0} appears in more than one pairing")]
    Overlapping(ParticipantId),
    #[error("paired participant {0} is not a member of the group")]
    NotGroupMember(ParticipantId),
}

/// Two participants whose balances are accounted for as one entity.
///
/// The merged balance is labelled by the representative, which defaults
/// to `member_a` when none was chosen.
///
/// # Examples
///
/// ```
/// use splitledger::core::pairing::Pairing;
/// use splitledger::core::participant::ParticipantId;
///
/// let couple = Pairing::new("ana".into(), "ben".into())
///     .unwrap()
///     .with_representative("ben".into())
///     .unwrap();
///
/// assert_eq!(couple.representative(), &ParticipantId::new("ben"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PairingRepr", into = "PairingRepr")]
pub struct Pairing {
    member_a: ParticipantId,
    member_b: ParticipantId,
    representative: Option<ParticipantId>,
}

impl Pairing {
    pub fn new(member_a: ParticipantId, member_b: ParticipantId) -> Result<Self, PairingError> {
        if member_a == member_b {
            return Err(PairingError::SelfPairing(member_a));
        }
        Ok(Self {
            member_a,
            member_b,
            representative: None,
        })
    }

    /// Choose which member labels the merged balance.
    pub fn with_representative(mut self, id: ParticipantId) -> Result<Self, PairingError> {
        if !self.contains(&id) {
            return Err(PairingError::RepresentativeNotMember {
                representative: id,
                member_a: self.member_a,
                member_b: self.member_b,
            });
        }
        self.representative = Some(id);
        Ok(self)
    }

    pub fn member_a(&self) -> &ParticipantId {
        &self.member_a
    }

    pub fn member_b(&self) -> &ParticipantId {
        &self.member_b
    }

    pub fn members(&self) -> [&ParticipantId; 2] {
        [&self.member_a, &self.member_b]
    }

    pub fn representative(&self) -> &ParticipantId {
        self.representative.as_ref().unwrap_or(&self.member_a)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        &self.member_a == id || &self.member_b == id
    }
}

/// Check that no participant appears in more than one pairing.
pub fn validate_pairings(pairings: &[Pairing]) -> Result<(), PairingError> {
    let mut seen: HashSet<&ParticipantId> = HashSet::new();
    for pairing in pairings {
        for member in pairing.members() {
            if !seen.insert(member) {
                return Err(PairingError::Overlapping(member.clone()));
            }
        }
    }
    Ok(())
}

/// Wire shape; routes deserialization through the validating constructors.
#[derive(Serialize, Deserialize)]
struct PairingRepr {
    member_a: ParticipantId,
    member_b: ParticipantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    representative: Option<ParticipantId>,
}

impl TryFrom<PairingRepr> for Pairing {
    type Error = PairingError;

    fn try_from(repr: PairingRepr) -> Result<Self, Self::Error> {
        let pairing = Pairing::new(repr.member_a, repr.member_b)?;
        match repr.representative {
            Some(id) => pairing.with_representative(id),
            None => Ok(pairing),
        }
    }
}

impl From<Pairing> for PairingRepr {
    fn from(pairing: Pairing) -> Self {
        Self {
            member_a: pairing.member_a,
            member_b: pairing.member_b,
            representative: pairing.representative,
        }
    }
}
