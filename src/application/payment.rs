use crate::domain::money::{
    apply_change, make_change, ChangeBank, ChangeBreakdown, Denomination, DenominationCounts,
};

/// Outcome of accepting one bill or coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashAcceptance {
    pub balance: u32,
    pub inserted_cash: DenominationCounts,
}

/// Owns the authoritative change bank and performs every cash movement.
///
/// Computing change is speculative; withdrawing it is transactional. The
/// bank is only mutated when a breakdown with zero shortage is committed, or
/// when inserted cash is deposited/refunded. Callers publish snapshots of it
/// into the machine state for display.
#[derive(Debug, Clone)]
pub struct PaymentProcessor {
    bank: ChangeBank,
}

impl PaymentProcessor {
    pub fn new(bank: ChangeBank) -> Self {
        Self { bank }
    }

    pub fn bank_snapshot(&self) -> ChangeBank {
        self.bank.clone()
    }

    /// Accepts one unit of cash: bumps the running balance and the
    /// per-denomination tally, and deposits the unit into the bank.
    pub fn accept_cash(
        &mut self,
        denomination: Denomination,
        balance: u32,
        inserted_cash: &DenominationCounts,
    ) -> CashAcceptance {
        let mut updated = inserted_cash.clone();
        *updated.entry(denomination).or_insert(0) += 1;
        self.bank.deposit(denomination);
        CashAcceptance {
            balance: balance + denomination.value(),
            inserted_cash: updated,
        }
    }

    /// Computes change for `balance - price` and commits the withdrawal only
    /// when the bank can fully cover it. On shortage the bank is untouched
    /// and the caller is expected to refund the whole inserted tally instead.
    pub fn make_change_for(&mut self, price: u32, balance: u32) -> ChangeBreakdown {
        let change_due = balance.saturating_sub(price);
        let breakdown = make_change(change_due, &self.bank);
        if breakdown.shortage == 0 {
            apply_change(&mut self.bank, &breakdown);
        }
        breakdown
    }

    /// Returns the full inserted tally to the customer. The cash was
    /// deposited on insertion, so it is withdrawn from the bank now; refunding
    /// money already in the bank cannot fall short.
    pub fn refund_inserted_cash(&mut self, inserted_cash: &DenominationCounts) -> ChangeBreakdown {
        let mut total = 0;
        let mut denominations = DenominationCounts::new();
        for (&denomination, &count) in inserted_cash {
            if count == 0 {
                continue;
            }
            total += denomination.value() * count;
            denominations.insert(denomination, count);
            self.bank.withdraw(denomination, count);
        }
        ChangeBreakdown {
            total,
            shortage: 0,
            denominations,
        }
    }
}
