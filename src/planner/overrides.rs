use tracing::debug;

use crate::catalog::MenuCatalog;
use crate::models::{CalorieTier, DishId, Ingredient, MealType, MenuSet, SetDish, SetId};

/// Where a dish's ingredient list came from.
#[derive(Debug, Clone, PartialEq)]
pub enum IngredientSource {
    Resolved(Vec<Ingredient>),
    /// A set referenced a dish with no custom ingredients and no catalog entry.
    Unresolved(DishId),
}

impl IngredientSource {
    /// Ingredients to scale; an unresolved dish contributes nothing.
    pub fn ingredients(&self) -> &[Ingredient] {
        match self {
            IngredientSource::Resolved(ings) => ings,
            IngredientSource::Unresolved(_) => &[],
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, IngredientSource::Resolved(_))
    }
}

/// A dish as served on a resolved day, with the tiers that receive it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDish {
    pub dish_id: DishId,
    pub name: String,
    pub meal_type: MealType,
    pub source: IngredientSource,
    pub tiers: Vec<CalorieTier>,
}

impl ResolvedDish {
    pub fn serves(&self, tier: CalorieTier) -> bool {
        self.tiers.contains(&tier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySource {
    Catalog,
    Override(SetId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDay {
    pub menu_day: u8,
    pub source: DaySource,
    pub dishes: Vec<ResolvedDish>,
}

impl ResolvedDay {
    /// Dishes served to `tier`, in resolution order.
    pub fn dishes_for(&self, tier: CalorieTier) -> impl Iterator<Item = &ResolvedDish> {
        self.dishes.iter().filter(move |d| d.serves(tier))
    }

    pub fn unresolved(&self) -> impl Iterator<Item = DishId> + '_ {
        self.dishes.iter().filter_map(|d| match d.source {
            IngredientSource::Unresolved(id) => Some(id),
            IngredientSource::Resolved(_) => None,
        })
    }
}

/// Decide what is served on `menu_day`.
///
/// A set with at least one calorie group for the day replaces the catalog
/// day entirely (the sixth meal included). Otherwise the catalog day plus its
/// sixth meal is served, filtered per tier by each dish's eligibility mask.
pub fn resolve_day(catalog: &MenuCatalog, menu_day: u8, active_set: Option<&MenuSet>) -> ResolvedDay {
    if let Some(set) = active_set {
        if let Some(groups) = set.day_groups(menu_day) {
            debug!(set_id = set.id, menu_day, groups = groups.len(), "menu day overridden by set");
            let dishes = groups
                .iter()
                .flat_map(|group| {
                    group.dishes.iter().map(move |sd| ResolvedDish {
                        dish_id: sd.dish_id,
                        name: sd.dish_name.clone(),
                        meal_type: sd.meal_type,
                        source: resolve_set_dish(catalog, sd),
                        tiers: vec![group.calories],
                    })
                })
                .collect();
            return ResolvedDay {
                menu_day,
                source: DaySource::Override(set.id),
                dishes,
            };
        }
    }

    let mut dishes: Vec<ResolvedDish> = catalog
        .day(menu_day)
        .map(|menu| {
            menu.dishes
                .iter()
                .map(|dish| ResolvedDish {
                    dish_id: dish.id,
                    name: dish.name.clone(),
                    meal_type: dish.meal_type,
                    source: IngredientSource::Resolved(dish.ingredients.clone()),
                    tiers: CalorieTier::ALL
                        .into_iter()
                        .filter(|t| dish.is_eligible(menu_day, *t))
                        .collect(),
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some(sixth) = catalog.sixth_meal_for(menu_day) {
        dishes.push(ResolvedDish {
            dish_id: sixth.id,
            name: sixth.name.clone(),
            meal_type: sixth.meal_type,
            source: IngredientSource::Resolved(sixth.ingredients.clone()),
            tiers: CalorieTier::ALL.to_vec(),
        });
    }

    debug!(menu_day, dishes = dishes.len(), "menu day served from catalog");
    ResolvedDay {
        menu_day,
        source: DaySource::Catalog,
        dishes,
    }
}

/// Ingredient source for a set dish: its own list, else the 21-day catalog
/// entry with the same id (the sixth-meal pool is not searched).
pub fn resolve_set_dish(catalog: &MenuCatalog, set_dish: &SetDish) -> IngredientSource {
    if let Some(custom) = set_dish.custom_ingredients() {
        return IngredientSource::Resolved(custom.to_vec());
    }
    match catalog.find_menu_dish(set_dish.dish_id) {
        Some(dish) => IngredientSource::Resolved(dish.ingredients.clone()),
        None => IngredientSource::Unresolved(set_dish.dish_id),
    }
}
