use proptest::prelude::*;
use rust_decimal::Decimal;
use splitledger::accounting::aggregate::BalanceAggregator;
use splitledger::accounting::merge::EntityMerger;
use splitledger::allocation::split::{SplitAllocator, SplitPolicy};
use splitledger::core::balance::Balances;
use splitledger::core::expense::Expense;
use splitledger::core::money::TOLERANCE;
use splitledger::core::pairing::Pairing;
use splitledger::core::participant::ParticipantId;
use splitledger::optimization::plan::SettlementPlan;
use splitledger::optimization::simplify::{Debt, DebtSimplifier};

fn pool() -> Vec<ParticipantId> {
    ["A", "B", "C", "D", "E", "F"]
        .into_iter()
        .map(ParticipantId::new)
        .collect()
}

/// Generate a random payer from the pool.
fn arb_participant() -> impl Strategy<Value = ParticipantId> {
    prop::sample::select(pool())
}

/// Generate an amount in whole cents, 1.00 to 1,000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (100i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate an equally split expense whose payer covers exactly the sum
/// of the rounded shares, so every expense conserves money.
fn arb_expense() -> impl Strategy<Value = Expense> {
    (
        arb_participant(),
        arb_amount(),
        prop::sample::subsequence(pool(), 1..=6),
    )
        .prop_filter_map("allocation must be positive", |(payer, amount, members)| {
            let splits = SplitAllocator::allocate(amount, SplitPolicy::Equal, &members, None);
            let owed: Decimal = splits.iter().map(|s| s.amount).sum();
            Expense::paid_by(payer, owed, splits).ok()
        })
}

/// Generate a random history of 1..40 expenses.
fn arb_expenses() -> impl Strategy<Value = Vec<Expense>> {
    prop::collection::vec(arb_expense(), 1..40)
}

fn settle(expenses: &[Expense], roster: &[ParticipantId]) -> (Balances, Vec<Debt>) {
    let balances = BalanceAggregator::aggregate(expenses, roster);
    let debts = DebtSimplifier::simplify(&balances);
    (balances, debts)
}

/// Net amount received by `id` across `debts`.
fn net_flow(debts: &[Debt], id: &ParticipantId) -> Decimal {
    debts
        .iter()
        .map(|d| {
            if &d.to == id {
                d.amount
            } else if &d.from == id {
                -d.amount
            } else {
                Decimal::ZERO
            }
        })
        .sum()
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Balances are conserved.
    //
    // Every paid unit is owed by someone, so balances sum to zero.
    // ===================================================================
    #[test]
    fn balances_are_conserved(expenses in arb_expenses()) {
        let balances = BalanceAggregator::aggregate(&expenses, &pool());
        prop_assert!(
            balances.is_conserved(),
            "Balances must sum to zero, got {}",
            balances.total()
        );
    }

    // ===================================================================
    // INVARIANT 2: Settlement is idempotent.
    //
    // Same input, same output. No hidden state, no randomness.
    // ===================================================================
    #[test]
    fn settlement_is_idempotent(expenses in arb_expenses()) {
        let first = settle(&expenses, &pool());
        let second = settle(&expenses, &pool());
        prop_assert_eq!(first, second);
    }

    // ===================================================================
    // INVARIANT 3: Expense order does not matter.
    // ===================================================================
    #[test]
    fn expense_order_does_not_change_balances(
        (expenses, shuffled) in arb_expenses()
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let original = BalanceAggregator::aggregate(&expenses, &pool());
        let reordered = BalanceAggregator::aggregate(&shuffled, &pool());
        prop_assert_eq!(original, reordered);
    }

    // ===================================================================
    // INVARIANT 4: Roster order does not change the debt list.
    // ===================================================================
    #[test]
    fn roster_order_does_not_change_debts(
        expenses in arb_expenses(),
        roster in Just(pool()).prop_shuffle(),
    ) {
        let (_, expected) = settle(&expenses, &pool());
        let (_, actual) = settle(&expenses, &roster);
        prop_assert_eq!(expected, actual);
    }

    // ===================================================================
    // INVARIANT 5: Debts are positive, bounded in number, and move
    // exactly what creditors are owed.
    // ===================================================================
    #[test]
    fn debts_are_positive_bounded_and_complete(expenses in arb_expenses()) {
        let (balances, debts) = settle(&expenses, &pool());
        let plan = SettlementPlan::from_balances(&balances, &debts);

        prop_assert!(debts.iter().all(|d| d.amount > Decimal::ZERO));
        prop_assert!(debts.iter().all(|d| d.from != d.to));
        prop_assert!(
            debts.len() <= plan.max_transactions(),
            "{} debts exceed bound {}",
            debts.len(),
            plan.max_transactions()
        );
        prop_assert!(plan.is_complete(), "unmatched residual: {:?}", plan);
    }

    // ===================================================================
    // INVARIANT 6: Paying a debt removes it from the next computation.
    // ===================================================================
    #[test]
    fn settlement_closes_debt(mut expenses in arb_expenses()) {
        let (_, debts) = settle(&expenses, &pool());
        if let Some(paid) = debts.first().cloned() {
            expenses.push(paid.to_settlement().to_expense().unwrap());
            let (balances, next) = settle(&expenses, &pool());

            prop_assert!(
                !next.iter().any(|d| d.from == paid.from && d.to == paid.to),
                "{} still present after settlement",
                paid
            );
            let debtor = balances.get(&paid.from);
            let creditor = balances.get(&paid.to);
            prop_assert!(debtor.abs() <= TOLERANCE || creditor.abs() <= TOLERANCE);
        }
    }

    // ===================================================================
    // INVARIANT 7: Pairing conserves money.
    //
    // The merged entity holds the algebraic sum of both balances and
    // settles the same net amount its members would have together, up to
    // one cent per entity left inside the settled band.
    // ===================================================================
    #[test]
    fn pairing_conserves_balances(
        expenses in arb_expenses(),
        members in prop::sample::subsequence(pool(), 2),
        choose_b in any::<bool>(),
    ) {
        let (a, b) = (members[0].clone(), members[1].clone());
        let mut pairing = Pairing::new(a.clone(), b.clone()).unwrap();
        if choose_b {
            pairing = pairing.with_representative(b.clone()).unwrap();
        }
        let representative = pairing.representative().clone();

        let (balances, debts) = settle(&expenses, &pool());
        let merged = EntityMerger::merge(&balances, &[pairing]);

        prop_assert_eq!(merged.len(), balances.len() - 1);
        prop_assert_eq!(merged.total(), balances.total());
        prop_assert_eq!(
            merged.get(&representative),
            balances.get(&a) + balances.get(&b)
        );

        let merged_debts = DebtSimplifier::simplify(&merged);
        let together = net_flow(&merged_debts, &representative);
        let apart = net_flow(&debts, &a) + net_flow(&debts, &b);
        prop_assert!(
            (together - apart).abs() <= TOLERANCE * Decimal::from(pool().len()),
            "merged entity settles {} but members settle {}",
            together,
            apart
        );
    }

    // ===================================================================
    // INVARIANT 8: Equal-split drift stays within half a cent per share.
    // ===================================================================
    #[test]
    fn equal_split_drift_is_bounded(
        amount in arb_amount(),
        members in prop::sample::subsequence(pool(), 1..=6),
    ) {
        let splits = SplitAllocator::allocate(amount, SplitPolicy::Equal, &members, None);
        let allocated: Decimal = splits.iter().map(|s| s.amount).sum();
        let bound = Decimal::new(5, 3) * Decimal::from(members.len());

        prop_assert_eq!(splits.len(), members.len());
        prop_assert!((amount - allocated).abs() <= bound);
    }
}
