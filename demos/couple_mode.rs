//! Couple mode: two flatmates settle as one household entity.
//!
//! Runs the snapshot pipeline twice over the same data, once with
//! pairing disabled and once with it enabled.

use splitledger::prelude::*;
use rust_decimal_macros::dec;

fn snapshot(pairing_enabled: bool) -> LedgerSnapshot {
    let members: Vec<ParticipantId> = ["ana", "ben", "cleo", "dan"]
        .into_iter()
        .map(Into::into)
        .collect();

    let mut flat = Group::new("flat", "Flat 3B", members.clone());
    flat.pairings.push(
        Pairing::new("ana".into(), "ben".into())
            .and_then(|p| p.with_representative("ben".into()))
            .expect("valid pairing"),
    );
    flat.pairing_enabled = pairing_enabled;

    let rent = SplitAllocator::allocate(dec!(1200), SplitPolicy::Equal, &members, None);
    let utilities = SplitAllocator::allocate(
        dec!(200),
        SplitPolicy::Percent,
        &members,
        Some(&[dec!(20), dec!(20), dec!(30), dec!(30)][..]),
    );

    LedgerSnapshot {
        participants: vec![
            Participant::new("ana", "Ana"),
            Participant::new("ben", "Ben"),
            Participant::new("cleo", "Cleo"),
            Participant::new("dan", "Dan"),
        ],
        groups: vec![flat],
        expenses: vec![
            Expense::paid_by("cleo", dec!(1200), rent)
                .expect("positive amount")
                .with_group("flat".into()),
            Expense::paid_by("ana", dec!(200), utilities)
                .expect("positive amount")
                .with_group("flat".into()),
        ]
        .into_iter()
        .collect(),
        settlements: Vec::new(),
    }
}

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  splitledger: Couple Mode Example        ║");
    println!("╚══════════════════════════════════════════╝\n");

    for enabled in [false, true] {
        let snap = snapshot(enabled);
        let report = SettlementEngine::compute(&snap, Some(&"flat".into())).expect("valid group");

        println!("━━━ Pairing {} ━━━\n", if enabled { "on" } else { "off" });
        for (id, balance) in report.entity_balances.iter() {
            println!("{:<6} {:>9}", snap.display_name(id), balance);
        }
        println!();
        for debt in &report.debts {
            println!(
                "{} pays {} {}",
                snap.display_name(&debt.from),
                snap.display_name(&debt.to),
                debt.amount
            );
        }
        println!("\n{}", report.plan);
    }
}
