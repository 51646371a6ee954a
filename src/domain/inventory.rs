use crate::error::{Result, VendingError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stock count for one drink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub drink_id: String,
    pub stock: u32,
}

impl InventorySlot {
    pub fn new(drink_id: impl Into<String>, stock: u32) -> Self {
        Self {
            drink_id: drink_id.into(),
            stock,
        }
    }
}

/// Per-drink stock counts. Counts are unsigned so stock can never go
/// negative; the only remaining input-validation failure is an unknown
/// drink id, which is rejected without touching state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryLedger {
    slots: BTreeMap<String, u32>,
}

impl InventoryLedger {
    pub fn new(initial: impl IntoIterator<Item = InventorySlot>) -> Self {
        Self {
            slots: initial
                .into_iter()
                .map(|slot| (slot.drink_id, slot.stock))
                .collect(),
        }
    }

    pub fn list(&self) -> Vec<InventorySlot> {
        self.slots
            .iter()
            .map(|(drink_id, &stock)| InventorySlot::new(drink_id.clone(), stock))
            .collect()
    }

    pub fn stock(&self, drink_id: &str) -> u32 {
        self.slots.get(drink_id).copied().unwrap_or(0)
    }

    pub fn is_in_stock(&self, drink_id: &str) -> bool {
        self.stock(drink_id) > 0
    }

    /// Takes one unit. Returns false and leaves the ledger unchanged when the
    /// slot is already empty or unknown.
    pub fn decrement(&mut self, drink_id: &str) -> bool {
        match self.slots.get_mut(drink_id) {
            Some(stock) if *stock > 0 => {
                *stock -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn restock(&mut self, drink_id: &str, amount: u32) -> Result<()> {
        let stock = self
            .slots
            .get_mut(drink_id)
            .ok_or_else(|| VendingError::UnknownDrink(drink_id.to_string()))?;
        *stock += amount;
        Ok(())
    }

    pub fn set_stock(&mut self, drink_id: &str, amount: u32) -> Result<()> {
        let stock = self
            .slots
            .get_mut(drink_id)
            .ok_or_else(|| VendingError::UnknownDrink(drink_id.to_string()))?;
        *stock = amount;
        Ok(())
    }
}

/// Stock levels used when no configuration overrides them.
pub fn default_inventory() -> Vec<InventorySlot> {
    vec![
        InventorySlot::new("cola", 10),
        InventorySlot::new("water", 15),
        InventorySlot::new("coffee", 12),
    ]
}
