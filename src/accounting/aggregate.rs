use crate::core::balance::Balances;
use crate::core::expense::Expense;
use crate::core::money::round_cents;
use crate::core::participant::ParticipantId;
use log::debug;
use rust_decimal::Decimal;

/// Folds an expense history into one net balance per participant.
pub struct BalanceAggregator;

impl BalanceAggregator {
    /// Compute the net balance of every participant on the roster.
    ///
    /// # Algorithm
    ///
    /// 1. Start every roster participant at zero.
    /// 2. Credit each payer with what they paid.
    /// 3. Debit each split participant with what they owe.
    ///
    /// Allocations naming a participant that is not on the roster are
    /// skipped, so history referencing a removed participant does not
    /// poison the computation. Sums are exact: no rounding is applied
    /// here, and expense order does not affect the result.
    pub fn aggregate(expenses: &[Expense], roster: &[ParticipantId]) -> Balances {
        let mut balances = Balances::zeroed(roster);

        for expense in expenses {
            for payer in expense.payers() {
                if !balances.adjust(&payer.participant, payer.amount) {
                    debug!(
                        "expense {}: skipping payer {} not on roster",
                        expense.id(),
                        payer.participant
                    );
                }
            }
            for split in expense.splits() {
                if !balances.adjust(&split.participant, -split.amount) {
                    debug!(
                        "expense {}: skipping split {} not on roster",
                        expense.id(),
                        split.participant
                    );
                }
            }
        }

        balances
    }

    /// Net balance of a single participant across `expenses`, rounded to
    /// cents. No roster is involved: every allocation naming
    /// `participant` counts.
    pub fn balance_of(participant: &ParticipantId, expenses: &[Expense]) -> Decimal {
        let balance: Decimal = expenses
            .iter()
            .map(|expense| {
                let paid: Decimal = expense
                    .payers()
                    .iter()
                    .filter(|p| &p.participant == participant)
                    .map(|p| p.amount)
                    .sum();
                let owed: Decimal = expense
                    .splits()
                    .iter()
                    .filter(|s| &s.participant == participant)
                    .map(|s| s.amount)
                    .sum();
                paid - owed
            })
            .sum();
        round_cents(balance)
    }
}
