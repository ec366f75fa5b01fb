use crate::core::expense::{Allocation, Expense, ExpenseError};
use crate::core::group::GroupId;
use crate::core::participant::ParticipantId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A real-world repayment confirmed by the caller.
///
/// The engine never records settlements itself. Callers append these to
/// their history and the next computation picks them up through
/// [`SettlementRecord::to_expense`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub from: ParticipantId,
    pub to: ParticipantId,
    #[serde(deserialize_with = "positive_amount")]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl SettlementRecord {
    pub fn new(from: ParticipantId, to: ParticipantId, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            group: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Model the repayment as an expense: `from` pays the amount and `to`
    /// owes all of it, which moves both balances toward zero.
    pub fn to_expense(&self) -> Result<Expense, ExpenseError> {
        let expense = Expense::paid_by(
            self.from.clone(),
            self.amount,
            vec![Allocation::new(self.to.clone(), self.amount)],
        )?
        .with_id(self.id)
        .with_title(format!("Settlement {} -> {}", self.from, self.to));

        Ok(match &self.group {
            Some(group) => expense.with_group(group.clone()),
            None => expense,
        })
    }
}

fn positive_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
    if amount <= Decimal::ZERO {
        return Err(de::Error::custom(ExpenseError::NonPositiveAmount(amount)));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_settlement_to_expense() {
        let record = SettlementRecord::new("B".into(), "C".into(), dec!(45));
        let expense = record.to_expense().unwrap();

        assert_eq!(expense.id(), record.id);
        assert_eq!(expense.payers(), &[Allocation::new("B", dec!(45))]);
        assert_eq!(expense.splits(), &[Allocation::new("C", dec!(45))]);
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_settlement_keeps_group() {
        let record =
            SettlementRecord::new("A".into(), "B".into(), dec!(5)).with_group(GroupId::new("g1"));
        let expense = record.to_expense().unwrap();
        assert_eq!(expense.group(), Some(&GroupId::new("g1")));
    }

    #[test]
    fn test_zero_settlement_is_rejected() {
        let record = SettlementRecord::new("A".into(), "B".into(), Decimal::ZERO);
        assert!(record.to_expense().is_err());
    }

    #[test]
    fn test_deserialize_rejects_non_positive_amount() {
        for amount in ["-45", "0"] {
            let json = format!(r#"{{"from":"B","to":"C","amount":"{}"}}"#, amount);
            assert!(serde_json::from_str::<SettlementRecord>(&json).is_err());
        }
        let json = r#"{"from":"B","to":"C","amount":"45"}"#;
        let record: SettlementRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.amount, dec!(45));
    }
}
