use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::dish::{DishId, Ingredient};
use crate::models::tier::CalorieTier;

/// Portions already prepared on one date, per dish and tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CookedStats {
    pub portions: BTreeMap<DishId, BTreeMap<CalorieTier, u32>>,
}

impl CookedStats {
    pub fn get(&self, dish_id: DishId, tier: CalorieTier) -> u32 {
        self.portions
            .get(&dish_id)
            .and_then(|tiers| tiers.get(&tier))
            .copied()
            .unwrap_or(0)
    }

    /// Add portions and return the new cumulative count.
    pub fn record(&mut self, dish_id: DishId, tier: CalorieTier, portions: u32) -> u32 {
        let cell = self
            .portions
            .entry(dish_id)
            .or_default()
            .entry(tier)
            .or_insert(0);
        *cell += portions;
        *cell
    }

    pub fn total_for_dish(&self, dish_id: DishId) -> u32 {
        self.portions
            .get(&dish_id)
            .map(|tiers| tiers.values().sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.portions.is_empty()
    }
}

/// One reported cooked batch, with the deductions already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CookBatch {
    pub date: NaiveDate,
    pub dish_id: DishId,
    pub tier: CalorieTier,
    pub portions: u32,
    /// Scaled ingredient amounts to take out of stock.
    pub deductions: Vec<Ingredient>,
}

/// Outcome of an applied batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookReceipt {
    pub date: NaiveDate,
    pub dish_id: DishId,
    pub tier: CalorieTier,
    /// Cumulative portions for (date, dish, tier) after this batch.
    pub cooked_total: u32,
    /// Stock deltas applied, as positive amounts taken out.
    pub deductions: Vec<Ingredient>,
    /// Remaining stock per deducted ingredient after this batch.
    pub remaining: BTreeMap<String, f64>,
    /// False when no ingredients could be resolved and nothing was deducted.
    pub resolved: bool,
}
