//! Weekend trip: split a few bills, settle up, record a repayment.
//!
//! Demonstrates the allocator, aggregator and simplifier working on
//! plain data.

use splitledger::prelude::*;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  splitledger: Trip Settlement Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let roster: Vec<ParticipantId> = ["ana", "ben", "cleo"].into_iter().map(Into::into).collect();

    // --- Scenario 1: splitting bills ---
    println!("━━━ Scenario 1: Splitting Bills ━━━\n");

    let cabin = SplitAllocator::allocate(dec!(90), SplitPolicy::Equal, &roster, None);
    let groceries = SplitAllocator::allocate(
        dec!(30),
        SplitPolicy::Shares,
        &roster[..2],
        Some(&[dec!(1), dec!(1)][..]),
    );
    let fuel = SplitAllocator::allocate(dec!(10), SplitPolicy::Equal, &roster, None);

    for (label, splits) in [("Cabin", &cabin), ("Groceries", &groceries), ("Fuel", &fuel)] {
        let shares: Vec<String> = splits
            .iter()
            .map(|s| format!("{} {}", s.participant, s.amount))
            .collect();
        println!("{:<10} {}", label, shares.join(", "));
    }
    println!("(fuel shares sum to 9.99: the cent of drift is kept)\n");

    let mut expenses = vec![
        Expense::paid_by("cleo", dec!(90), cabin).expect("positive amount"),
        Expense::paid_by("ana", dec!(30), groceries).expect("positive amount"),
        Expense::paid_by("ben", dec!(10), fuel).expect("positive amount"),
    ];

    // --- Scenario 2: balances and debts ---
    println!("━━━ Scenario 2: Settle Up ━━━\n");

    let balances = BalanceAggregator::aggregate(&expenses, &roster);
    for (id, balance) in balances.rounded().iter() {
        println!("{:<6} {:>8}", id, balance);
    }
    println!();

    let debts = DebtSimplifier::simplify(&balances);
    for debt in &debts {
        println!("{}", debt);
    }
    println!("\n{}", SettlementPlan::from_balances(&balances, &debts));

    // --- Scenario 3: recording a repayment ---
    println!("━━━ Scenario 3: After Ben Pays ━━━\n");

    let record = debts[0].to_settlement();
    expenses.push(record.to_expense().expect("positive amount"));

    let balances = BalanceAggregator::aggregate(&expenses, &roster);
    for debt in DebtSimplifier::simplify(&balances) {
        println!("{}", debt);
    }
}
