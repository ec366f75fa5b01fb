use crate::core::expense::Allocation;
use crate::core::money::round_cents;
use crate::core::participant::ParticipantId;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rule used to divide an expense's cost among participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Same share for everyone.
    Equal,
    /// Weights are the owed amounts themselves.
    Exact,
    /// Weights are percentages of the total.
    Percent,
    /// Weights are relative shares of the total.
    Shares,
}

impl SplitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitPolicy::Equal => "equal",
            SplitPolicy::Exact => "exact",
            SplitPolicy::Percent => "percent",
            SplitPolicy::Shares => "shares",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown split policy '{0}', expected equal, exact, percent or shares")]
pub struct UnknownSplitPolicy(pub String);

impl FromStr for SplitPolicy {
    type Err = UnknownSplitPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equal" => Ok(SplitPolicy::Equal),
            "exact" => Ok(SplitPolicy::Exact),
            "percent" => Ok(SplitPolicy::Percent),
            "shares" => Ok(SplitPolicy::Shares),
            _ => Err(UnknownSplitPolicy(s.to_string())),
        }
    }
}

/// Divides an expense's total across its participants.
pub struct SplitAllocator;

impl SplitAllocator {
    /// Allocate `total` across `participants` under `policy`.
    ///
    /// Shares computed by division are rounded to cents one by one, so
    /// their sum may drift from `total` by a few cents. The drift is kept
    /// as is. `Exact` weights are used verbatim and are not checked
    /// against the total.
    ///
    /// An empty list is returned when the input cannot be allocated: no
    /// participants, missing weights or a weight count that does not
    /// match the participant count, `Shares` weights summing to zero, or
    /// weights large enough to overflow the arithmetic.
    ///
    /// # Examples
    ///
    /// ```
    /// use splitledger::allocation::split::{SplitAllocator, SplitPolicy};
    /// use splitledger::core::participant::ParticipantId;
    /// use rust_decimal_macros::dec;
    ///
    /// let people: Vec<ParticipantId> = ["a", "b", "c"].into_iter().map(Into::into).collect();
    /// let shares = SplitAllocator::allocate(dec!(10), SplitPolicy::Equal, &people, None);
    ///
    /// assert!(shares.iter().all(|s| s.amount == dec!(3.33)));
    /// ```
    pub fn allocate(
        total: Decimal,
        policy: SplitPolicy,
        participants: &[ParticipantId],
        weights: Option<&[Decimal]>,
    ) -> Vec<Allocation> {
        if participants.is_empty() {
            warn!("{} split of {} has no participants", policy, total);
            return Vec::new();
        }

        let weights = match (policy, weights) {
            (SplitPolicy::Equal, _) => &[][..],
            (_, Some(w)) if w.len() == participants.len() => w,
            (_, Some(w)) => {
                warn!(
                    "{} split has {} weights for {} participants",
                    policy,
                    w.len(),
                    participants.len()
                );
                return Vec::new();
            }
            (_, None) => {
                warn!("{} split requires weights", policy);
                return Vec::new();
            }
        };

        let owed: Option<Vec<Decimal>> = match policy {
            SplitPolicy::Exact => Some(weights.to_vec()),
            SplitPolicy::Percent => weights
                .iter()
                .map(|&weight| Self::weighted_share(total, weight, Decimal::ONE_HUNDRED))
                .collect(),
            SplitPolicy::Shares => {
                let total_shares = weights
                    .iter()
                    .try_fold(Decimal::ZERO, |sum, &weight| sum.checked_add(weight));
                match total_shares {
                    Some(sum) if sum.is_zero() => {
                        warn!("shares split has weights summing to zero");
                        return Vec::new();
                    }
                    Some(sum) => weights
                        .iter()
                        .map(|&weight| Self::weighted_share(total, weight, sum))
                        .collect(),
                    None => None,
                }
            }
            SplitPolicy::Equal => {
                let share = round_cents(total / Decimal::from(participants.len()));
                Some(vec![share; participants.len()])
            }
        };

        match owed {
            Some(owed) => participants
                .iter()
                .zip(owed)
                .map(|(id, amount)| Allocation::new(id.clone(), amount))
                .collect(),
            None => {
                warn!("{} split of {} overflows", policy, total);
                Vec::new()
            }
        }
    }

    /// `total * weight / divisor` rounded to cents, or `None` on overflow.
    fn weighted_share(total: Decimal, weight: Decimal, divisor: Decimal) -> Option<Decimal> {
        total
            .checked_mul(weight)?
            .checked_div(divisor)
            .map(round_cents)
    }
}
