//! Property-based tests for the change-making engine.
//!
//! The greedy descent is only trusted because these invariants hold for the
//! configured denomination set; they are asserted here rather than assumed.

use proptest::prelude::*;
use std::collections::BTreeMap;
use vendo::{apply_change, make_change, ChangeBank, Denomination, DenominationCounts};

fn arb_bank() -> impl Strategy<Value = ChangeBank> {
    (0u32..30, 0u32..30, 0u32..15, 0u32..6, 0u32..4).prop_map(
        |(c100, c500, c1000, c5000, c10000)| {
            ChangeBank::new(DenominationCounts::from([
                (Denomination::Won100, c100),
                (Denomination::Won500, c500),
                (Denomination::Won1000, c1000),
                (Denomination::Won5000, c5000),
                (Denomination::Won10000, c10000),
            ]))
        },
    )
}

/// Amounts the machine can actually owe: multiples of the smallest
/// denomination.
fn arb_amount() -> impl Strategy<Value = u32> {
    (0u32..=500).prop_map(|units| units * 100)
}

fn breakdown_value(denominations: &BTreeMap<Denomination, u32>) -> u32 {
    denominations
        .iter()
        .map(|(denomination, count)| denomination.value() * count)
        .sum()
}

/// Bounded-knapsack oracle: can some combination of the bank's units sum to
/// exactly `amount`? All values are multiples of 100, so the table works in
/// 100-unit steps.
fn exact_cover_exists(amount: u32, bank: &ChangeBank) -> bool {
    let target = (amount / 100) as usize;
    let mut reachable = vec![false; target + 1];
    reachable[0] = true;
    for denomination in Denomination::DESCENDING {
        let step = (denomination.value() / 100) as usize;
        for _ in 0..bank.count(denomination) {
            for i in (step..=target).rev() {
                if reachable[i - step] {
                    reachable[i] = true;
                }
            }
        }
    }
    reachable[target]
}

proptest! {
    /// total + shortage always reconstructs the requested amount, and the
    /// denomination counts sum to exactly the covered total.
    #[test]
    fn breakdown_accounts_for_every_unit(amount in arb_amount(), bank in arb_bank()) {
        let change = make_change(amount, &bank);
        prop_assert_eq!(change.total + change.shortage, amount);
        prop_assert_eq!(breakdown_value(&change.denominations), change.total);
    }

    /// Computing change never mutates the bank, shortage or not.
    #[test]
    fn computation_is_speculative(amount in arb_amount(), bank in arb_bank()) {
        let before = bank.clone();
        let _ = make_change(amount, &bank);
        prop_assert_eq!(bank, before);
    }

    /// The breakdown never uses more of a denomination than the bank holds,
    /// so committing it can never underflow a slot.
    #[test]
    fn breakdown_is_coverable_by_the_bank(amount in arb_amount(), bank in arb_bank()) {
        let change = make_change(amount, &bank);
        for (&denomination, &count) in &change.denominations {
            prop_assert!(count <= bank.count(denomination));
        }
        let mut committed = bank.clone();
        apply_change(&mut committed, &change);
        prop_assert_eq!(committed.total_value(), bank.total_value() - change.total);
    }

    /// For this denomination set greedy descent is exact: it covers the
    /// amount fully whenever any combination of the bank's units could.
    /// Checked against a bounded-knapsack oracle instead of being assumed,
    /// since greedy is not exact for arbitrary denomination sets.
    #[test]
    fn greedy_is_exact_for_the_configured_set(amount in arb_amount(), bank in arb_bank()) {
        let change = make_change(amount, &bank);
        prop_assert_eq!(change.shortage == 0, exact_cover_exists(amount, &bank));
        if amount > bank.total_value() {
            prop_assert!(change.shortage > 0);
        }
    }

    /// Depositing a unit and asking for exactly its value hands the same
    /// unit back, restoring the bank.
    #[test]
    fn deposit_then_change_round_trips(bank in arb_bank(), pick in 0usize..5) {
        let denomination = Denomination::DESCENDING[pick];
        let mut working = bank.clone();
        working.deposit(denomination);
        let change = make_change(denomination.value(), &working);
        prop_assert_eq!(change.shortage, 0);
        apply_change(&mut working, &change);
        prop_assert_eq!(working.total_value(), bank.total_value());
    }

    /// Same inputs, same breakdown: no hidden randomness.
    #[test]
    fn change_making_is_deterministic(amount in arb_amount(), bank in arb_bank()) {
        prop_assert_eq!(make_change(amount, &bank), make_change(amount, &bank));
    }
}
