use crate::domain::money::ChangeBreakdown;
use crate::domain::state::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A completed sale, immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub drink_id: String,
    pub drink_name: String,
    pub payment_method: PaymentMethod,
    pub amount_charged: u32,
    pub change: Option<ChangeBreakdown>,
    pub completed_at: DateTime<Utc>,
}

/// Bounded append-only record of completed transactions. Oldest entries are
/// evicted first once the capacity is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLog {
    entries: VecDeque<TransactionSummary>,
    capacity: usize,
}

impl TransactionLog {
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, summary: TransactionSummary) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(summary);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransactionSummary> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<TransactionSummary> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
