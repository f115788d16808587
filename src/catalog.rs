//! The built-in 21-day rotation and sixth-meal pool.
//!
//! There is exactly one copy of the catalog: `data/menu_catalog.json`,
//! embedded at compile time and parsed once.

use std::collections::HashSet;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::{KitchenError, Result};
use crate::models::{CalorieTier, DailyMenu, Dish, DishId, MealType};
use crate::planner::constants::{MENU_CYCLE_DAYS, SIXTH_MEAL_POOL_SIZE};
use crate::planner::cycle::sixth_meal_index;

const CATALOG_JSON: &str = include_str!("../data/menu_catalog.json");

static BUILTIN: LazyLock<MenuCatalog> = LazyLock::new(|| {
    MenuCatalog::from_json(CATALOG_JSON).expect("embedded menu catalog must be valid")
});

/// Meal slots every menu day is expected to fill.
const DAILY_MEAL_TYPES: [MealType; 5] = [
    MealType::Breakfast,
    MealType::SecondBreakfast,
    MealType::Lunch,
    MealType::Snack,
    MealType::Dinner,
];

#[derive(Debug, Clone, Deserialize)]
pub struct MenuCatalog {
    days: Vec<DailyMenu>,
    sixth_meals: Vec<Dish>,
}

impl MenuCatalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> &'static MenuCatalog {
        &BUILTIN
    }

    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalog: MenuCatalog = serde_json::from_str(json)?;
        catalog.days.sort_by_key(|d| d.menu_number);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Structural checks: full rotation, unique ids, sane masks.
    pub fn validate(&self) -> Result<()> {
        if self.days.len() as i64 != MENU_CYCLE_DAYS {
            return Err(KitchenError::InvalidInput(format!(
                "catalog has {} menu days, expected {}",
                self.days.len(),
                MENU_CYCLE_DAYS
            )));
        }
        if self.sixth_meals.len() != SIXTH_MEAL_POOL_SIZE {
            return Err(KitchenError::InvalidInput(format!(
                "catalog has {} sixth meals, expected {}",
                self.sixth_meals.len(),
                SIXTH_MEAL_POOL_SIZE
            )));
        }

        let mut seen: HashSet<DishId> = HashSet::new();
        for (pos, menu) in self.days.iter().enumerate() {
            if usize::from(menu.menu_number) != pos + 1 {
                return Err(KitchenError::InvalidInput(format!(
                    "menu day {} out of sequence",
                    menu.menu_number
                )));
            }
            for meal in DAILY_MEAL_TYPES {
                if !menu.dishes.iter().any(|d| d.meal_type == meal) {
                    return Err(KitchenError::InvalidInput(format!(
                        "menu day {} has no {} dish",
                        menu.menu_number, meal
                    )));
                }
            }
            for dish in &menu.dishes {
                check_masks(dish)?;
            }
        }

        for dish in self.all_dishes() {
            if !seen.insert(dish.id) {
                return Err(KitchenError::InvalidInput(format!(
                    "duplicate dish id {}",
                    dish.id
                )));
            }
        }
        Ok(())
    }

    pub fn days(&self) -> &[DailyMenu] {
        &self.days
    }

    pub fn day(&self, menu_day: u8) -> Option<&DailyMenu> {
        self.days.iter().find(|d| d.menu_number == menu_day)
    }

    pub fn sixth_meals(&self) -> &[Dish] {
        &self.sixth_meals
    }

    /// The sixth-meal dish appended to `menu_day` at read time.
    pub fn sixth_meal_for(&self, menu_day: u8) -> Option<&Dish> {
        self.sixth_meals.get(sixth_meal_index(menu_day))
    }

    /// Dish lookup restricted to the 21 menu days (not the sixth-meal pool).
    pub fn find_menu_dish(&self, id: DishId) -> Option<&Dish> {
        self.days.iter().find_map(|d| d.find_dish(id))
    }

    /// Dish lookup across the menu days and the sixth-meal pool.
    pub fn find_dish(&self, id: DishId) -> Option<&Dish> {
        self.find_menu_dish(id)
            .or_else(|| self.sixth_meals.iter().find(|d| d.id == id))
    }

    pub fn all_dishes(&self) -> impl Iterator<Item = &Dish> {
        self.days
            .iter()
            .flat_map(|d| d.dishes.iter())
            .chain(self.sixth_meals.iter())
    }
}

fn check_masks(dish: &Dish) -> Result<()> {
    let Some(masks) = &dish.calorie_mappings else {
        return Ok(());
    };
    for (day, tiers) in masks {
        let valid_day = day
            .parse::<i64>()
            .map(|d| (1..=MENU_CYCLE_DAYS).contains(&d))
            .unwrap_or(false);
        if !valid_day {
            return Err(KitchenError::InvalidInput(format!(
                "dish {} masks unknown menu day '{}'",
                dish.id, day
            )));
        }
        if let Some(bad) = tiers.iter().find(|k| CalorieTier::from_kcal(**k).is_none()) {
            return Err(KitchenError::InvalidInput(format!(
                "dish {} masks unknown tier {}",
                dish.id, bad
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_complete() {
        let catalog = MenuCatalog::builtin();
        assert_eq!(catalog.days().len(), 21);
        assert_eq!(catalog.sixth_meals().len(), 20);
        for day in 1..=21u8 {
            assert_eq!(catalog.day(day).unwrap().menu_number, day);
        }
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_dish_ids_unique_across_menu_and_pool() {
        let catalog = MenuCatalog::builtin();
        let ids: HashSet<DishId> = catalog.all_dishes().map(|d| d.id).collect();
        assert_eq!(ids.len(), catalog.all_dishes().count());
    }

    #[test]
    fn test_day_one_lunch() {
        let catalog = MenuCatalog::builtin();
        let lunch = catalog
            .day(1)
            .unwrap()
            .dishes
            .iter()
            .find(|d| d.meal_type == MealType::Lunch)
            .unwrap();
        assert_eq!(lunch.name, "Asosiy taom");
        let beef = lunch
            .ingredients
            .iter()
            .find(|i| i.name == "Mol go'shti")
            .unwrap();
        assert_eq!(beef.amount, 85.7);
        assert_eq!(beef.unit, "gr");
    }

    #[test]
    fn test_sixth_meal_rotation_repeats_once() {
        let catalog = MenuCatalog::builtin();
        let first = catalog.sixth_meal_for(1).unwrap();
        assert_eq!(first.meal_type, MealType::SixthMeal);
        assert_eq!(catalog.sixth_meal_for(21).unwrap().id, first.id);
        assert_ne!(catalog.sixth_meal_for(20).unwrap().id, first.id);
    }

    #[test]
    fn test_menu_lookup_excludes_sixth_meal_pool() {
        let catalog = MenuCatalog::builtin();
        let sixth_id = catalog.sixth_meals()[0].id;
        assert!(catalog.find_menu_dish(sixth_id).is_none());
        assert!(catalog.find_dish(sixth_id).is_some());
    }

    #[test]
    fn test_validate_rejects_short_rotation() {
        let json = r#"{"days": [], "sixth_meals": []}"#;
        assert!(MenuCatalog::from_json(json).is_err());
    }
}
