use crate::allocation::split::SplitPolicy;
use crate::core::group::GroupId;
use crate::core::money::{approx_eq, TOLERANCE};
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when building or validating an expense.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    #[error("expense amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("payers of expense {id} sum to {paid}, expected {amount}")]
    PayerSumMismatch {
        id: Uuid,
        paid: Decimal,
        amount: Decimal,
    },
    #[error("splits of expense {id} sum to {owed}, expected {amount}")]
    SplitSumMismatch {
        id: Uuid,
        owed: Decimal,
        amount: Decimal,
    },
}

/// One participant's share of an expense: either what they paid or what
/// they owe, depending on which side of the expense it sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub participant: ParticipantId,
    pub amount: Decimal,
}

impl Allocation {
    pub fn new(participant: impl Into<ParticipantId>, amount: Decimal) -> Self {
        Self {
            participant: participant.into(),
            amount,
        }
    }
}

/// A shared cost: who paid for it and who owes what.
///
/// The payer side usually holds a single allocation for the full amount;
/// the split side is normally produced by
/// [`SplitAllocator`](crate::allocation::split::SplitAllocator).
///
/// # Examples
///
/// ```
/// use splitledger::core::expense::{Allocation, Expense};
/// use rust_decimal_macros::dec;
///
/// let dinner = Expense::paid_by(
///     "carol",
///     dec!(90),
///     vec![
///         Allocation::new("alice", dec!(30)),
///         Allocation::new("bob", dec!(30)),
///         Allocation::new("carol", dec!(30)),
///     ],
/// )
/// .unwrap();
///
/// assert_eq!(dinner.amount(), dec!(90));
/// assert!(dinner.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ExpenseRepr", into = "ExpenseRepr")]
pub struct Expense {
    id: Uuid,
    title: Option<String>,
    amount: Decimal,
    payers: Vec<Allocation>,
    splits: Vec<Allocation>,
    group: Option<GroupId>,
    policy: Option<SplitPolicy>,
    created_at: DateTime<Utc>,
}

impl Expense {
    /// Create an expense from explicit payer and split allocations.
    pub fn new(
        amount: Decimal,
        payers: Vec<Allocation>,
        splits: Vec<Allocation>,
    ) -> Result<Self, ExpenseError> {
        if amount <= Decimal::ZERO {
            return Err(ExpenseError::NonPositiveAmount(amount));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: None,
            amount,
            payers,
            splits,
            group: None,
            policy: None,
            created_at: Utc::now(),
        })
    }

    /// Create an expense fully paid by a single participant.
    pub fn paid_by(
        payer: impl Into<ParticipantId>,
        amount: Decimal,
        splits: Vec<Allocation>,
    ) -> Result<Self, ExpenseError> {
        Self::new(amount, vec![Allocation::new(payer, amount)], splits)
    }

    /// Replace the generated ID (useful for testing / determinism).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Record which split policy produced the splits.
    pub fn with_policy(mut self, policy: SplitPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Check that both sides of the expense add up to its amount.
    ///
    /// Payers must match within one cent. Splits may drift by up to one
    /// cent per share, since each share is rounded independently.
    pub fn validate(&self) -> Result<(), ExpenseError> {
        let paid = self.total_paid();
        if !approx_eq(paid, self.amount, TOLERANCE) {
            return Err(ExpenseError::PayerSumMismatch {
                id: self.id,
                paid,
                amount: self.amount,
            });
        }

        let owed = self.total_owed();
        let share_count = Decimal::from(self.splits.len().max(1));
        if !approx_eq(owed, self.amount, TOLERANCE * share_count) {
            return Err(ExpenseError::SplitSumMismatch {
                id: self.id,
                owed,
                amount: self.amount,
            });
        }
        Ok(())
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn payers(&self) -> &[Allocation] {
        &self.payers
    }

    pub fn splits(&self) -> &[Allocation] {
        &self.splits
    }

    pub fn group(&self) -> Option<&GroupId> {
        self.group.as_ref()
    }

    pub fn policy(&self) -> Option<SplitPolicy> {
        self.policy
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn total_paid(&self) -> Decimal {
        self.payers.iter().map(|p| p.amount).sum()
    }

    pub fn total_owed(&self) -> Decimal {
        self.splits.iter().map(|s| s.amount).sum()
    }
}

/// An ordered collection of expenses handed to the engine as one snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseSet {
    expenses: Vec<Expense>,
}

impl ExpenseSet {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
        }
    }

    pub fn add(&mut self, expense: Expense) {
        self.expenses.push(expense);
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Total value of all expenses.
    pub fn gross_total(&self) -> Decimal {
        self.expenses.iter().map(|e| e.amount()).sum()
    }

    /// All unique participants referenced as payer or split.
    pub fn participants(&self) -> Vec<ParticipantId> {
        let mut participants: Vec<ParticipantId> = self
            .expenses
            .iter()
            .flat_map(|e| e.payers().iter().chain(e.splits()))
            .map(|a| a.participant.clone())
            .collect();
        participants.sort();
        participants.dedup();
        participants
    }

    /// The expenses recorded against `group`.
    pub fn for_group(&self, group: &GroupId) -> ExpenseSet {
        self.expenses
            .iter()
            .filter(|e| e.group() == Some(group))
            .cloned()
            .collect()
    }
}

/// Wire shape; deserialized expenses go through [`Expense::new`].
#[derive(Serialize, Deserialize)]
struct ExpenseRepr {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    amount: Decimal,
    payers: Vec<Allocation>,
    splits: Vec<Allocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<GroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    policy: Option<SplitPolicy>,
    #[serde(default = "Utc::now")]
    created_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRepr> for Expense {
    type Error = ExpenseError;

    fn try_from(repr: ExpenseRepr) -> Result<Self, Self::Error> {
        let mut expense = Expense::new(repr.amount, repr.payers, repr.splits)?.with_id(repr.id);
        expense.title = repr.title;
        expense.group = repr.group;
        expense.policy = repr.policy;
        expense.created_at = repr.created_at;
        Ok(expense)
    }
}

impl From<Expense> for ExpenseRepr {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id,
            title: expense.title,
            amount: expense.amount,
            payers: expense.payers,
            splits: expense.splits,
            group: expense.group,
            policy: expense.policy,
            created_at: expense.created_at,
        }
    }
}

impl FromIterator<Expense> for ExpenseSet {
    fn from_iter<T: IntoIterator<Item = Expense>>(iter: T) -> Self {
        Self {
            expenses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn dinner() -> Expense {
        Expense::paid_by(
            "C",
            dec!(90),
            vec![
                Allocation::new("A", dec!(30)),
                Allocation::new("B", dec!(30)),
                Allocation::new("C", dec!(30)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_expense_creation() {
        let expense = dinner();
        assert_eq!(expense.amount(), dec!(90));
        assert_eq!(expense.payers().len(), 1);
        assert_eq!(expense.payers()[0].participant.as_str(), "C");
        assert_eq!(expense.total_owed(), dec!(90));
    }

    #[test]
    fn test_expense_zero_amount() {
        let result = Expense::paid_by("A", Decimal::ZERO, vec![]);
        assert_eq!(result.unwrap_err(), ExpenseError::NonPositiveAmount(Decimal::ZERO));
    }

    #[test]
    fn test_expense_negative_amount() {
        assert!(Expense::paid_by("A", dec!(-5), vec![]).is_err());
    }

    #[test]
    fn test_deserialize_rejects_non_positive_amount() {
        for amount in ["-50", "0"] {
            let json = format!(
                r#"{{"amount":"{}","payers":[{{"participant":"A","amount":"{}"}}],"splits":[]}}"#,
                amount, amount
            );
            let result = serde_json::from_str::<Expense>(&json);
            assert!(result.is_err(), "amount {} should be rejected", amount);
        }
    }

    #[test]
    fn test_deserialize_keeps_optional_fields() {
        let json = r#"{
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "title": "Groceries",
            "amount": "30",
            "payers": [{"participant": "A", "amount": "30"}],
            "splits": [{"participant": "B", "amount": "30"}],
            "group": "flat",
            "policy": "exact"
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.title(), Some("Groceries"));
        assert_eq!(expense.group(), Some(&GroupId::new("flat")));
        assert_eq!(expense.policy(), Some(SplitPolicy::Exact));
        assert_eq!(
            expense.id().to_string(),
            "7c9e6679-7425-40de-944b-e07fc1f90ae7"
        );
    }

    #[test]
    fn test_validate_accepts_rounding_drift() {
        let expense = Expense::paid_by(
            "A",
            dec!(10),
            vec![
                Allocation::new("A", dec!(3.33)),
                Allocation::new("B", dec!(3.33)),
                Allocation::new("C", dec!(3.33)),
            ],
        )
        .unwrap();
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_payer_mismatch() {
        let expense = Expense::new(
            dec!(50),
            vec![Allocation::new("A", dec!(40))],
            vec![Allocation::new("B", dec!(50))],
        )
        .unwrap();
        assert!(matches!(
            expense.validate(),
            Err(ExpenseError::PayerSumMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_split_mismatch() {
        let expense = Expense::paid_by(
            "A",
            dec!(50),
            vec![Allocation::new("A", dec!(20)), Allocation::new("B", dec!(20))],
        )
        .unwrap();
        assert!(matches!(
            expense.validate(),
            Err(ExpenseError::SplitSumMismatch { .. })
        ));
    }

    #[test]
    fn test_expense_set_participants_and_total() {
        let mut set = ExpenseSet::new();
        set.add(dinner());
        set.add(
            Expense::paid_by(
                "D",
                dec!(20),
                vec![Allocation::new("A", dec!(10)), Allocation::new("D", dec!(10))],
            )
            .unwrap(),
        );
        assert_eq!(set.gross_total(), dec!(110));
        assert_eq!(set.participants().len(), 4);
    }

    #[test]
    fn test_expense_set_for_group() {
        let trip = GroupId::new("trip");
        let set: ExpenseSet = vec![
            dinner().with_group(trip.clone()),
            dinner(),
            dinner().with_group(GroupId::new("flat")),
        ]
        .into_iter()
        .collect();

        let filtered = set.for_group(&trip);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.expenses()[0].group(), Some(&trip));
    }
}
