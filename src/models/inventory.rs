use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A warehouse stock line, keyed by exact ingredient name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

/// Amount and unit of one ingredient in an aggregated map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientTotal {
    pub amount: f64,
    pub unit: String,
}

/// Ingredient name to total. Names match exactly, without normalisation.
pub type IngredientMap = BTreeMap<String, IngredientTotal>;

/// Snapshot of warehouse stock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: BTreeMap<String, InventoryItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later items with the same name replace earlier ones.
    pub fn from_items<I: IntoIterator<Item = InventoryItem>>(items: I) -> Self {
        let items = items
            .into_iter()
            .map(|item| (item.name.clone(), item))
            .collect();
        Self { items }
    }

    pub fn get(&self, name: &str) -> Option<&InventoryItem> {
        self.items.get(name)
    }

    /// Stock on hand, zero when the ingredient is not stocked at all.
    pub fn amount_of(&self, name: &str) -> f64 {
        self.items.get(name).map(|i| i.amount).unwrap_or(0.0)
    }

    /// Add `delta` (negative to deduct). Unknown names are created, so a
    /// deduction of something never stocked shows up as a shortfall.
    pub fn apply_delta(&mut self, name: &str, delta: f64, unit: &str) -> f64 {
        let item = self
            .items
            .entry(name.to_string())
            .or_insert_with(|| InventoryItem {
                name: name.to_string(),
                amount: 0.0,
                unit: unit.to_string(),
            });
        item.amount += delta;
        item.amount
    }

    /// Replace a stock line outright.
    pub fn upsert(&mut self, item: InventoryItem) {
        self.items.insert(item.name.clone(), item);
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.values()
    }

    pub fn to_items(&self) -> Vec<InventoryItem> {
        self.items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
