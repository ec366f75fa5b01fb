use crate::core::balance::Balances;
use crate::core::money::{round_cents, TOLERANCE};
use crate::core::participant::ParticipantId;
use crate::core::settlement::SettlementRecord;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed repayment: `from` pays `to` a positive `amount`.
///
/// Either side may be a plain participant or a pairing representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Decimal,
}

impl Debt {
    /// The settlement record that closes this debt once it has been paid.
    pub fn to_settlement(&self) -> SettlementRecord {
        SettlementRecord::new(self.from.clone(), self.to.clone(), self.amount)
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, self.amount)
    }
}

/// An entity still waiting to be matched, with what is left of its claim.
#[derive(Debug)]
struct OpenPosition {
    id: ParticipantId,
    remaining: Decimal,
}

/// Turns net balances into a short list of point-to-point payments.
pub struct DebtSimplifier;

impl DebtSimplifier {
    /// Greedy two-pointer settlement of `balances`.
    ///
    /// # Algorithm
    ///
    /// 1. Balances above one cent are creditors, balances below minus one
    ///    cent are debtors; anything in between is already settled.
    /// 2. Both lists are sorted by amount, largest first, ties broken by
    ///    ascending id, so the output is fully determined by the input.
    /// 3. Walk both lists: the current debtor pays the current creditor
    ///    `min(owed, due)`. A cursor moves on once its remainder drops
    ///    below one cent.
    ///
    /// At most `creditors + debtors - 1` debts are produced. The result
    /// is small but not guaranteed minimal. Input that does not sum to
    /// zero leaves some claims unmatched; this is not reported here, see
    /// [`SettlementPlan`](crate::optimization::plan::SettlementPlan).
    pub fn simplify(balances: &Balances) -> Vec<Debt> {
        let (mut creditors, mut debtors) = Self::open_positions(balances);

        let mut debts = Vec::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let mut i = 0;
        let mut j = 0;

        while i < creditors.len() && j < debtors.len() {
            let creditor = &mut creditors[i];
            let debtor = &mut debtors[j];
            let settled = creditor.remaining.min(debtor.remaining);

            if settled > TOLERANCE {
                debts.push(Debt {
                    from: debtor.id.clone(),
                    to: creditor.id.clone(),
                    amount: round_cents(settled),
                });
            } else {
                debug!(
                    "dropping {} match between {} and {}",
                    settled, debtor.id, creditor.id
                );
            }

            creditor.remaining -= settled;
            debtor.remaining -= settled;

            if creditor.remaining < TOLERANCE {
                i += 1;
            }
            if debtor.remaining < TOLERANCE {
                j += 1;
            }
        }

        debts
    }

    /// Split balances into creditors and debtors, each sorted largest
    /// claim first.
    fn open_positions(balances: &Balances) -> (Vec<OpenPosition>, Vec<OpenPosition>) {
        let mut creditors = Vec::new();
        let mut debtors = Vec::new();

        for (id, balance) in balances.iter() {
            if balance > TOLERANCE {
                creditors.push(OpenPosition {
                    id: id.clone(),
                    remaining: balance,
                });
            } else if balance < -TOLERANCE {
                debtors.push(OpenPosition {
                    id: id.clone(),
                    remaining: -balance,
                });
            }
        }

        let largest_first = |a: &OpenPosition, b: &OpenPosition| {
            b.remaining
                .cmp(&a.remaining)
                .then_with(|| a.id.cmp(&b.id))
        };
        creditors.sort_by(largest_first);
        debtors.sort_by(largest_first);

        (creditors, debtors)
    }
}
