use crate::core::balance::Balances;
use crate::core::money::TOLERANCE;
use crate::optimization::simplify::Debt;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Summary of a simplified debt list against the balances it settles.
///
/// The residual fields expose what the simplifier left unmatched. A
/// residual above the tolerance means the balances did not sum to zero,
/// which points at inconsistent expense data upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementPlan {
    pub creditor_count: usize,
    pub debtor_count: usize,
    /// Sum of balances above the tolerance.
    pub total_credit: Decimal,
    /// Sum of the magnitudes of balances below minus the tolerance.
    pub total_debit: Decimal,
    /// Sum of all debt amounts.
    pub total_transferred: Decimal,
    pub transaction_count: usize,
    pub residual_credit: Decimal,
    pub residual_debit: Decimal,
}

impl SettlementPlan {
    pub fn from_balances(balances: &Balances, debts: &[Debt]) -> Self {
        let mut creditor_count = 0;
        let mut debtor_count = 0;
        let mut total_credit = Decimal::ZERO;
        let mut total_debit = Decimal::ZERO;

        for (_, balance) in balances.iter() {
            if balance > TOLERANCE {
                creditor_count += 1;
                total_credit += balance;
            } else if balance < -TOLERANCE {
                debtor_count += 1;
                total_debit -= balance;
            }
        }

        let total_transferred: Decimal = debts.iter().map(|d| d.amount).sum();
        let plan = SettlementPlan {
            creditor_count,
            debtor_count,
            total_credit,
            total_debit,
            total_transferred,
            transaction_count: debts.len(),
            residual_credit: total_credit - total_transferred,
            residual_debit: total_debit - total_transferred,
        };

        if !plan.is_complete() {
            warn!(
                "settlement left {} credit and {} debit unmatched",
                plan.residual_credit, plan.residual_debit
            );
        }
        plan
    }

    /// Upper bound on debts the greedy sweep may emit.
    pub fn max_transactions(&self) -> usize {
        (self.creditor_count + self.debtor_count).saturating_sub(1)
    }

    /// True when both residuals are within one cent per entity involved.
    pub fn is_complete(&self) -> bool {
        let band = TOLERANCE * Decimal::from((self.creditor_count + self.debtor_count).max(1));
        self.residual_credit.abs() <= band && self.residual_debit.abs() <= band
    }
}

impl std::fmt::Display for SettlementPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement Plan ===")?;
        writeln!(f, "Creditors:        {}", self.creditor_count)?;
        writeln!(f, "Debtors:          {}", self.debtor_count)?;
        writeln!(f, "Total Owed:       {}", self.total_credit)?;
        writeln!(f, "Transferred:      {}", self.total_transferred)?;
        writeln!(
            f,
            "Transactions:     {} (bound {})",
            self.transaction_count,
            self.max_transactions()
        )?;
        writeln!(f, "Complete:         {}", self.is_complete())?;
        if !self.is_complete() {
            writeln!(f, "Residual Credit:  {}", self.residual_credit)?;
            writeln!(f, "Residual Debit:   {}", self.residual_debit)?;
        }
        Ok(())
    }
}
