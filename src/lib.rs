//! # splitledger
//!
//! Shared-expense balance and debt settlement engine.
//!
//! Given a roster of participants and their shared expenses, this engine
//! computes who owes whom and reduces the result to a short list of
//! repayments.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, expenses, pairings, groups, balances
//! - **allocation** — Splitting an expense's cost under a split policy
//! - **accounting** — Aggregating expenses into balances, merging paired participants
//! - **optimization** — Greedy debt simplification and settlement plans
//! - **engine** — Snapshot pipeline wiring the components together
//! - **simulation** — Random scenario generation

pub mod accounting;
pub mod allocation;
pub mod core;
pub mod engine;
pub mod error;
pub mod optimization;

pub use error::{EngineError, Result};

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::accounting::aggregate::BalanceAggregator;
    pub use crate::accounting::merge::EntityMerger;
    pub use crate::allocation::split::{SplitAllocator, SplitPolicy};
    pub use crate::core::balance::Balances;
    pub use crate::core::expense::{Allocation, Expense, ExpenseSet};
    pub use crate::core::group::{Group, GroupId};
    pub use crate::core::pairing::Pairing;
    pub use crate::core::participant::{Participant, ParticipantId};
    pub use crate::core::settlement::SettlementRecord;
    pub use crate::engine::{LedgerSnapshot, SettlementEngine, SettlementReport};
    pub use crate::optimization::plan::SettlementPlan;
    pub use crate::optimization::simplify::{Debt, DebtSimplifier};
}
