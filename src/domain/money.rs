use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A face value of currency the machine accepts and dispenses.
///
/// The machine only ever deals in this fixed set; amounts are plain `u32`
/// values in the same unit, but a denomination is never an arbitrary integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Denomination {
    #[serde(rename = "100")]
    Won100,
    #[serde(rename = "500")]
    Won500,
    #[serde(rename = "1000")]
    Won1000,
    #[serde(rename = "5000")]
    Won5000,
    #[serde(rename = "10000")]
    Won10000,
}

impl Denomination {
    /// Largest-first order used by the greedy change pass.
    pub const DESCENDING: [Denomination; 5] = [
        Denomination::Won10000,
        Denomination::Won5000,
        Denomination::Won1000,
        Denomination::Won500,
        Denomination::Won100,
    ];

    pub fn value(self) -> u32 {
        match self {
            Denomination::Won100 => 100,
            Denomination::Won500 => 500,
            Denomination::Won1000 => 1000,
            Denomination::Won5000 => 5000,
            Denomination::Won10000 => 10000,
        }
    }
}

/// Per-denomination tally, used both for the inserted-cash record and for
/// change breakdowns.
pub type DenominationCounts = BTreeMap<Denomination, u32>;

/// The machine's reserve of denominations available for change and refunds.
///
/// Counts are unsigned, so the "never negative" invariant holds by
/// construction. Only [`ChangeBank::deposit`] and [`apply_change`] mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeBank {
    counts: DenominationCounts,
}

impl ChangeBank {
    pub fn new(counts: DenominationCounts) -> Self {
        Self { counts }
    }

    /// Seed counts the machine starts with when no configuration overrides
    /// them.
    pub fn default_seed() -> Self {
        Self::new(DenominationCounts::from([
            (Denomination::Won100, 20),
            (Denomination::Won500, 20),
            (Denomination::Won1000, 10),
            (Denomination::Won5000, 4),
            (Denomination::Won10000, 2),
        ]))
    }

    pub fn count(&self, denomination: Denomination) -> u32 {
        self.counts.get(&denomination).copied().unwrap_or(0)
    }

    /// Records one accepted bill or coin.
    pub fn deposit(&mut self, denomination: Denomination) {
        *self.counts.entry(denomination).or_insert(0) += 1;
    }

    /// Removes `count` units, clamped at zero. The clamp is a floor that
    /// should never trigger while the breakdown invariants hold.
    pub fn withdraw(&mut self, denomination: Denomination, count: u32) {
        let slot = self.counts.entry(denomination).or_insert(0);
        *slot = slot.saturating_sub(count);
    }

    /// Total value of the reserve.
    pub fn total_value(&self) -> u32 {
        self.counts
            .iter()
            .map(|(denomination, count)| denomination.value() * count)
            .sum()
    }

    pub fn counts(&self) -> &DenominationCounts {
        &self.counts
    }
}

/// A decomposition of an amount into denomination counts, plus whatever part
/// of the amount the bank could not cover.
///
/// Invariant: `total + shortage` equals the requested amount, and the counts
/// in `denominations` sum to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBreakdown {
    pub total: u32,
    pub shortage: u32,
    pub denominations: DenominationCounts,
}

impl ChangeBreakdown {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Greedy largest-first decomposition of `amount` against `bank`.
///
/// Purely speculative: the bank is only read. Callers commit the result with
/// [`apply_change`] once they have decided the shortage is acceptable
/// (normally only when it is zero). Greedy descent is not optimal for
/// arbitrary denomination sets; for the fixed set used here it is exact, and
/// the property tests assert that rather than assuming it.
pub fn make_change(amount: u32, bank: &ChangeBank) -> ChangeBreakdown {
    if amount == 0 {
        return ChangeBreakdown::zero();
    }

    let mut remaining = amount;
    let mut denominations = DenominationCounts::new();

    for denomination in Denomination::DESCENDING {
        let value = denomination.value();
        if remaining < value {
            continue;
        }
        let available = bank.count(denomination);
        if available == 0 {
            continue;
        }
        let used = (remaining / value).min(available);
        if used > 0 {
            denominations.insert(denomination, used);
            remaining -= used * value;
        }
    }

    ChangeBreakdown {
        total: amount - remaining,
        shortage: remaining,
        denominations,
    }
}

/// Commits a previously computed breakdown by withdrawing its counts from the
/// bank.
pub fn apply_change(bank: &mut ChangeBank, change: &ChangeBreakdown) {
    for (&denomination, &count) in &change.denominations {
        bank.withdraw(denomination, count);
    }
}

/// Formats an amount for user-facing status messages, e.g. `₩1,500`.
pub fn format_won(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("₩{grouped}")
}
