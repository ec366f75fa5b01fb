use crate::core::balance::Balances;
use crate::core::pairing::{validate_pairings, Pairing, PairingError};
use crate::core::participant::ParticipantId;
use log::debug;

/// Folds paired participants into single accounting entities.
pub struct EntityMerger;

impl EntityMerger {
    /// Merge each pairing's two balances into one entry keyed by the
    /// pairing's representative.
    ///
    /// Both members are removed and their combined balance is inserted
    /// under the representative; a member without a balance counts as
    /// zero. Unpaired entities pass through unchanged.
    ///
    /// Pairings must be disjoint. This is not checked here; use
    /// [`EntityMerger::merge_checked`] or validate upstream.
    pub fn merge(balances: &Balances, pairings: &[Pairing]) -> Balances {
        let mut merged = balances.clone();

        for pairing in pairings {
            let a = merged.remove(pairing.member_a()).unwrap_or_default();
            let b = merged.remove(pairing.member_b()).unwrap_or_default();
            let combined = a + b;
            debug!(
                "merged {} ({}) and {} ({}) into {} ({})",
                pairing.member_a(),
                a,
                pairing.member_b(),
                b,
                pairing.representative(),
                combined
            );
            merged.insert(pairing.representative().clone(), combined);
        }

        merged
    }

    /// Validate that `pairings` are disjoint, then merge.
    pub fn merge_checked(
        balances: &Balances,
        pairings: &[Pairing],
    ) -> Result<Balances, PairingError> {
        validate_pairings(pairings)?;
        Ok(Self::merge(balances, pairings))
    }

    /// The entity that carries `participant`'s balance after merging.
    pub fn entity_of<'a>(
        pairings: &'a [Pairing],
        participant: &'a ParticipantId,
    ) -> &'a ParticipantId {
        pairings
            .iter()
            .find(|p| p.contains(participant))
            .map(|p| p.representative())
            .unwrap_or(participant)
    }
}
