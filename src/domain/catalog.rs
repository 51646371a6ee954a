use crate::error::{Result, VendingError};
use serde::{Deserialize, Serialize};

/// A sellable drink. The catalog is static configuration; only inventory
/// counts change at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: String,
    pub name: String,
    pub price: u32,
}

impl Drink {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// The fixed list of drinks the machine sells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    drinks: Vec<Drink>,
}

impl Catalog {
    /// Validates and wraps a drink list. Prices must be positive and ids
    /// unique.
    pub fn new(drinks: Vec<Drink>) -> Result<Self> {
        if drinks.is_empty() {
            return Err(VendingError::InvalidCatalog("no drinks configured".into()));
        }
        for (i, drink) in drinks.iter().enumerate() {
            if drink.price == 0 {
                return Err(VendingError::InvalidCatalog(format!(
                    "drink '{}' has zero price",
                    drink.id
                )));
            }
            if drinks[..i].iter().any(|other| other.id == drink.id) {
                return Err(VendingError::InvalidCatalog(format!(
                    "duplicate drink id '{}'",
                    drink.id
                )));
            }
        }
        Ok(Self { drinks })
    }

    pub fn get(&self, id: &str) -> Option<&Drink> {
        self.drinks.iter().find(|drink| drink.id == id)
    }

    pub fn drinks(&self) -> &[Drink] {
        &self.drinks
    }
}

/// Catalog used when no configuration overrides it.
pub fn default_drinks() -> Vec<Drink> {
    vec![
        Drink::new("cola", "Cola", 1100),
        Drink::new("water", "Water", 600),
        Drink::new("coffee", "Coffee", 700),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(default_drinks()).unwrap();
        assert_eq!(catalog.get("cola").unwrap().price, 1100);
        assert!(catalog.get("juice").is_none());
    }

    #[test]
    fn test_catalog_rejects_zero_price() {
        let result = Catalog::new(vec![Drink::new("free", "Free", 0)]);
        assert!(matches!(result, Err(VendingError::InvalidCatalog(_))));
    }

    #[test]
    fn test_catalog_rejects_duplicate_ids() {
        let result = Catalog::new(vec![
            Drink::new("cola", "Cola", 1100),
            Drink::new("cola", "Cola Zero", 1200),
        ]);
        assert!(matches!(result, Err(VendingError::InvalidCatalog(_))));
    }

    #[test]
    fn test_catalog_rejects_empty_list() {
        assert!(matches!(
            Catalog::new(vec![]),
            Err(VendingError::InvalidCatalog(_))
        ));
    }
}
