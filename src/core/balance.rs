use crate::core::money::{is_settled, round_cents};
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Net balance of each participant or merged entity.
///
/// A positive balance means the entity is owed money (net creditor).
/// A negative balance means the entity owes money (net debtor).
///
/// Balances are derived values: they are recomputed from the full
/// expense history and never patched incrementally. Entries are kept in
/// identifier order so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    entries: BTreeMap<ParticipantId, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// A zero balance for every participant on the roster.
    pub fn zeroed<'a>(roster: impl IntoIterator<Item = &'a ParticipantId>) -> Self {
        Self {
            entries: roster
                .into_iter()
                .map(|id| (id.clone(), Decimal::ZERO))
                .collect(),
        }
    }

    /// Balance of `id`; a missing entry counts as zero.
    pub fn get(&self, id: &ParticipantId) -> Decimal {
        self.entries.get(id).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.entries.contains_key(id)
    }

    /// Add `delta` to an existing entry. Returns `false` and leaves the
    /// balances untouched when `id` has no entry.
    pub fn adjust(&mut self, id: &ParticipantId, delta: Decimal) -> bool {
        match self.entries.get_mut(id) {
            Some(balance) => {
                *balance += delta;
                true
            }
            None => false,
        }
    }

    pub fn insert(&mut self, id: ParticipantId, balance: Decimal) -> Option<Decimal> {
        self.entries.insert(id, balance)
    }

    pub fn remove(&mut self, id: &ParticipantId) -> Option<Decimal> {
        self.entries.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, Decimal)> {
        self.entries.iter().map(|(id, &balance)| (id, balance))
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Algebraic sum of all balances.
    pub fn total(&self) -> Decimal {
        self.entries.values().sum()
    }

    /// True when every paid unit is owed by someone, within one cent.
    pub fn is_conserved(&self) -> bool {
        is_settled(self.total())
    }

    /// Copy with every balance rounded to cents, for display.
    pub fn rounded(&self) -> Balances {
        Self {
            entries: self
                .entries
                .iter()
                .map(|(id, &balance)| (id.clone(), round_cents(balance)))
                .collect(),
        }
    }
}

impl FromIterator<(ParticipantId, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Decimal)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zeroed_roster() {
        let roster = vec![ParticipantId::new("A"), ParticipantId::new("B")];
        let balances = Balances::zeroed(&roster);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get(&"A".into()), Decimal::ZERO);
        assert!(balances.is_conserved());
    }

    #[test]
    fn test_adjust_skips_unknown() {
        let roster = vec![ParticipantId::new("A")];
        let mut balances = Balances::zeroed(&roster);
        assert!(balances.adjust(&"A".into(), dec!(12.5)));
        assert!(!balances.adjust(&"ghost".into(), dec!(3)));
        assert_eq!(balances.get(&"A".into()), dec!(12.5));
        assert!(!balances.contains(&"ghost".into()));
    }

    #[test]
    fn test_total_is_conserved() {
        let balances: Balances = vec![
            (ParticipantId::new("A"), dec!(-15)),
            (ParticipantId::new("B"), dec!(-45)),
            (ParticipantId::new("C"), dec!(60)),
        ]
        .into_iter()
        .collect();
        assert_eq!(balances.total(), Decimal::ZERO);
        assert!(balances.is_conserved());
    }

    #[test]
    fn test_rounded_copy() {
        let balances: Balances = vec![(ParticipantId::new("A"), dec!(3.33333))]
            .into_iter()
            .collect();
        assert_eq!(balances.rounded().get(&"A".into()), dec!(3.33));
        assert_eq!(balances.get(&"A".into()), dec!(3.33333));
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let balances: Balances = vec![
            (ParticipantId::new("zoe"), dec!(1)),
            (ParticipantId::new("adam"), dec!(-1)),
        ]
        .into_iter()
        .collect();
        let ids: Vec<&str> = balances.ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["adam", "zoe"]);
    }
}
