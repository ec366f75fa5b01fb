//! Snapshot pipeline: allocation output in, balances and debts out.
//!
//! [`SettlementEngine::compute`] wires the aggregator, the merger and the
//! simplifier together over one immutable [`LedgerSnapshot`]. Nothing is
//! cached between calls; every change to the inputs means a fresh
//! computation.

use crate::accounting::aggregate::BalanceAggregator;
use crate::accounting::merge::EntityMerger;
use crate::core::balance::Balances;
use crate::core::expense::ExpenseSet;
use crate::core::group::{Group, GroupId};
use crate::core::participant::{Participant, ParticipantId};
use crate::core::settlement::SettlementRecord;
use crate::error::{EngineError, Result};
use crate::optimization::plan::SettlementPlan;
use crate::optimization::simplify::{Debt, DebtSimplifier};
use log::debug;
use serde::{Deserialize, Serialize};

/// Everything the engine needs, as plain data.
///
/// Mirrors the shape of an application backup: the roster, groups,
/// expense history and recorded repayments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub expenses: ExpenseSet,
    #[serde(default)]
    pub settlements: Vec<SettlementRecord>,
}

impl LedgerSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| &g.id == id)
    }

    /// Identifiers of every participant, in roster order.
    pub fn roster(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    /// Display name for `id`, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a ParticipantId) -> &'a str {
        self.participants
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.name.as_str())
            .unwrap_or_else(|| id.as_str())
    }

    /// Expenses plus recorded settlements, converted to expenses.
    pub fn history(&self) -> Result<ExpenseSet> {
        let mut history = self.expenses.clone();
        for settlement in &self.settlements {
            history.add(settlement.to_expense()?);
        }
        Ok(history)
    }
}

/// Balances and debts computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    /// Per-participant balances, rounded to cents.
    pub balances: Balances,
    /// Balances after pairings were merged, rounded to cents. Equal to
    /// `balances` when no pairing applies.
    pub entity_balances: Balances,
    pub debts: Vec<Debt>,
    pub plan: SettlementPlan,
}

/// Runs the full balance and settlement pipeline.
pub struct SettlementEngine;

impl SettlementEngine {
    /// Compute balances and simplified debts for the whole snapshot, or
    /// for one group of it.
    ///
    /// # Algorithm
    ///
    /// 1. Roster: the group's members, or every participant.
    /// 2. History: expenses plus recorded settlements, restricted to the
    ///    group when one is given.
    /// 3. Aggregate into per-participant balances.
    /// 4. If the group has pairing enabled, validate its pairings and
    ///    merge each pair into one entity.
    /// 5. Simplify into debts and summarise the plan.
    pub fn compute(snapshot: &LedgerSnapshot, group: Option<&GroupId>) -> Result<SettlementReport> {
        let group = match group {
            Some(id) => Some(
                snapshot
                    .group(id)
                    .ok_or_else(|| EngineError::UnknownGroup(id.clone()))?,
            ),
            None => None,
        };

        let history = snapshot.history()?;
        let (roster, history) = match group {
            Some(g) => (g.members.clone(), history.for_group(&g.id)),
            None => (snapshot.roster(), history),
        };
        debug!(
            "computing settlement over {} participants and {} expenses",
            roster.len(),
            history.len()
        );

        let balances = BalanceAggregator::aggregate(history.expenses(), &roster);

        let entity_balances = match group {
            Some(g) if !g.active_pairings().is_empty() => {
                g.validate()?;
                EntityMerger::merge(&balances, g.active_pairings())
            }
            _ => balances.clone(),
        };

        let debts = DebtSimplifier::simplify(&entity_balances);
        let plan = SettlementPlan::from_balances(&entity_balances, &debts);

        Ok(SettlementReport {
            group: group.map(|g| g.id.clone()),
            balances: balances.rounded(),
            entity_balances: entity_balances.rounded(),
            debts,
            plan,
        })
    }
}
