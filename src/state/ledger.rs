use chrono::NaiveDate;
use tracing::{info, warn};

use crate::catalog::MenuCatalog;
use crate::error::{KitchenError, Result};
use crate::models::{
    CalorieTier, CookBatch, CookReceipt, CookedStats, DishId, Ingredient, Inventory, MealType,
    MenuSet, SetId,
};
use crate::planner::{CycleResolver, IngredientSource, resolve_day, scale};
use crate::state::sets::SetRegistry;
use crate::state::store::LedgerStore;

/// Records cooked batches and takes their ingredients out of stock.
pub struct CookingLedger<'a, S: LedgerStore> {
    catalog: &'a MenuCatalog,
    sets: &'a SetRegistry,
    resolver: CycleResolver,
    store: S,
}

/// What a cooked dish was made of, as far as it could be resolved.
struct CookedDish {
    meal_type: MealType,
    source: IngredientSource,
}

impl<'a, S: LedgerStore> CookingLedger<'a, S> {
    pub fn new(
        catalog: &'a MenuCatalog,
        sets: &'a SetRegistry,
        resolver: CycleResolver,
        store: S,
    ) -> Self {
        Self {
            catalog,
            sets,
            resolver,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report `portions` of `dish_id` cooked for `tier` on `date`.
    ///
    /// The cooked counter always advances. Ingredients are resolved the same
    /// way the demand side resolves them (set override for the day, else the
    /// catalog day, else anywhere in the catalog), scaled and deducted in the
    /// same atomic batch. A dish that resolves to nothing deducts nothing and
    /// the receipt says so.
    pub fn record_cooked(
        &self,
        date: NaiveDate,
        dish_id: DishId,
        tier: CalorieTier,
        portions: u32,
        set_id: Option<SetId>,
    ) -> Result<CookReceipt> {
        if portions == 0 {
            return Err(KitchenError::InvalidInput(
                "cooked portions must be at least 1".to_string(),
            ));
        }
        let set = match set_id {
            Some(id) => Some(self.sets.get(id).ok_or(KitchenError::SetNotFound(id))?),
            None => None,
        };

        let menu_day = self.resolver.menu_day_of(date);
        let dish = self.find_cooked_dish(menu_day, dish_id, tier, set);

        let (deductions, resolved) = match &dish {
            Some(CookedDish {
                meal_type,
                source: IngredientSource::Resolved(ingredients),
            }) => (
                positive(scale(ingredients, tier, *meal_type, f64::from(portions))),
                true,
            ),
            _ => {
                warn!(dish_id, menu_day, "cooked dish has no ingredients, nothing deducted");
                (Vec::new(), false)
            }
        };

        let batch = CookBatch {
            date,
            dish_id,
            tier,
            portions,
            deductions,
        };
        let mut receipt = self.store.apply_batch(&batch)?;
        receipt.resolved = resolved;

        info!(
            %date,
            menu_day,
            dish_id,
            tier = tier.kcal(),
            portions,
            cooked_total = receipt.cooked_total,
            deducted = receipt.deductions.len(),
            "recorded cooked batch"
        );
        Ok(receipt)
    }

    pub fn cooked_stats(&self, date: NaiveDate) -> Result<CookedStats> {
        self.store.cooked_stats(date)
    }

    pub fn inventory(&self) -> Result<Inventory> {
        self.store.inventory()
    }

    fn find_cooked_dish(
        &self,
        menu_day: u8,
        dish_id: DishId,
        tier: CalorieTier,
        set: Option<&MenuSet>,
    ) -> Option<CookedDish> {
        let day = resolve_day(self.catalog, menu_day, set);
        let candidates = || day.dishes.iter().filter(|d| d.dish_id == dish_id);

        let served = candidates()
            .find(|d| d.serves(tier))
            .or_else(|| candidates().next());
        if let Some(d) = served {
            return Some(CookedDish {
                meal_type: d.meal_type,
                source: d.source.clone(),
            });
        }

        self.catalog.find_dish(dish_id).map(|d| CookedDish {
            meal_type: d.meal_type,
            source: IngredientSource::Resolved(d.ingredients.clone()),
        })
    }
}

fn positive(ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
    ingredients.into_iter().filter(|i| i.amount > 0.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalorieGroup, InventoryItem, SetDish};
    use crate::state::manager::{KitchenState, MemoryStore};

    fn epoch() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn store_with(items: &[(&str, f64, &str)]) -> MemoryStore {
        let inventory = Inventory::from_items(items.iter().map(|(n, a, u)| InventoryItem {
            name: n.to_string(),
            amount: *a,
            unit: u.to_string(),
        }));
        MemoryStore::new(KitchenState::new(inventory))
    }

    fn override_set() -> MenuSet {
        let mut set = MenuSet::new(4, "Bahor");
        set.calorie_groups.insert(
            1,
            vec![CalorieGroup {
                calories: CalorieTier::Kcal1200,
                dishes: vec![
                    SetDish {
                        dish_id: 3,
                        dish_name: "Asosiy taom".to_string(),
                        meal_type: MealType::Lunch,
                        custom_ingredients: Some(vec![Ingredient::new("Qo'y go'shti", 90.0, "gr")]),
                    },
                    SetDish {
                        dish_id: 777,
                        dish_name: "Yo'qolgan taom".to_string(),
                        meal_type: MealType::Dinner,
                        custom_ingredients: None,
                    },
                ],
            }],
        );
        set
    }

    #[test]
    fn test_cook_deducts_scaled_catalog_ingredients() {
        let catalog = MenuCatalog::builtin();
        let sets = SetRegistry::default();
        let ledger = CookingLedger::new(
            catalog,
            &sets,
            CycleResolver::default(),
            store_with(&[("Mol go'shti", 1000.0, "gr")]),
        );

        // 1600 lunch multiplier is 1.5: 85.7 * 1.5 * 2 = 257.1
        let receipt = ledger
            .record_cooked(epoch(), 3, CalorieTier::Kcal1600, 2, None)
            .unwrap();

        assert!(receipt.resolved);
        assert_eq!(receipt.cooked_total, 2);
        assert_eq!(receipt.remaining["Mol go'shti"], 1000.0 - 257.1);
        assert_eq!(
            ledger.cooked_stats(epoch()).unwrap().get(3, CalorieTier::Kcal1600),
            2
        );
    }

    #[test]
    fn test_sixth_meal_at_1200_deducts_nothing() {
        let catalog = MenuCatalog::builtin();
        let sets = SetRegistry::default();
        let ledger = CookingLedger::new(
            catalog,
            &sets,
            CycleResolver::default(),
            store_with(&[("Kefir", 500.0, "ml")]),
        );

        let receipt = ledger
            .record_cooked(epoch(), 106, CalorieTier::Kcal1200, 3, None)
            .unwrap();
        assert!(receipt.resolved);
        assert!(receipt.deductions.is_empty());
        assert_eq!(ledger.inventory().unwrap().amount_of("Kefir"), 500.0);
    }

    #[test]
    fn test_set_custom_ingredients_are_deducted() {
        let catalog = MenuCatalog::builtin();
        let sets = SetRegistry::new(vec![override_set()]);
        let ledger = CookingLedger::new(
            catalog,
            &sets,
            CycleResolver::default(),
            store_with(&[("Qo'y go'shti", 100.0, "gr"), ("Mol go'shti", 100.0, "gr")]),
        );

        let receipt = ledger
            .record_cooked(epoch(), 3, CalorieTier::Kcal1200, 2, Some(4))
            .unwrap();
        assert_eq!(receipt.remaining["Qo'y go'shti"], -80.0);

        let inventory = ledger.inventory().unwrap();
        assert_eq!(inventory.amount_of("Mol go'shti"), 100.0);
    }

    #[test]
    fn test_unresolved_set_dish_records_without_deducting() {
        let catalog = MenuCatalog::builtin();
        let sets = SetRegistry::new(vec![override_set()]);
        let ledger = CookingLedger::new(catalog, &sets, CycleResolver::default(), store_with(&[]));

        let receipt = ledger
            .record_cooked(epoch(), 777, CalorieTier::Kcal1200, 5, Some(4))
            .unwrap();
        assert!(!receipt.resolved);
        assert!(receipt.deductions.is_empty());
        assert_eq!(receipt.cooked_total, 5);
        assert!(ledger.inventory().unwrap().is_empty());
    }

    #[test]
    fn test_off_cycle_dish_found_anywhere_in_catalog() {
        let catalog = MenuCatalog::builtin();
        let sets = SetRegistry::default();
        let ledger = CookingLedger::new(catalog, &sets, CycleResolver::default(), store_with(&[]));

        // Day 2's lunch cooked on a day-1 date.
        let receipt = ledger
            .record_cooked(epoch(), 8, CalorieTier::Kcal1200, 1, None)
            .unwrap();
        assert!(receipt.resolved);
        assert_eq!(receipt.remaining["Mol go'shti"], -77.0);
    }

    #[test]
    fn test_unknown_set_and_zero_portions_are_rejected() {
        let catalog = MenuCatalog::builtin();
        let sets = SetRegistry::default();
        let ledger = CookingLedger::new(catalog, &sets, CycleResolver::default(), store_with(&[]));

        assert!(matches!(
            ledger.record_cooked(epoch(), 3, CalorieTier::Kcal1200, 1, Some(99)),
            Err(KitchenError::SetNotFound(99))
        ));
        assert!(matches!(
            ledger.record_cooked(epoch(), 3, CalorieTier::Kcal1200, 0, None),
            Err(KitchenError::InvalidInput(_))
        ));
    }
}
