use crate::models::{CalorieTier, Ingredient, MealType, TierMultipliers};
use crate::planner::constants::ROUNDING_SCALE;

/// Round to one decimal place.
#[inline]
pub fn round1(value: f64) -> f64 {
    (value * ROUNDING_SCALE).round() / ROUNDING_SCALE
}

/// Scale reference-portion ingredients to `portions` servings of `tier`.
///
/// Each amount becomes `round1(amount * multiplier * portions)`, never below zero.
pub fn scale(
    ingredients: &[Ingredient],
    tier: CalorieTier,
    meal_type: MealType,
    portions: f64,
) -> Vec<Ingredient> {
    scale_with(ingredients, tier.multipliers(), meal_type, portions)
}

/// Same as [`scale`] for a raw kcal value; values that are not a tier use the 1200 row.
pub fn scale_for_kcal(
    ingredients: &[Ingredient],
    kcal: u32,
    meal_type: MealType,
    portions: f64,
) -> Vec<Ingredient> {
    scale_with(ingredients, TierMultipliers::for_kcal(kcal), meal_type, portions)
}

fn scale_with(
    ingredients: &[Ingredient],
    multipliers: &TierMultipliers,
    meal_type: MealType,
    portions: f64,
) -> Vec<Ingredient> {
    let factor = multipliers.for_meal(meal_type) * portions;
    ingredients
        .iter()
        .map(|ing| Ingredient {
            name: ing.name.clone(),
            amount: round1(ing.amount * factor).max(0.0),
            unit: ing.unit.clone(),
        })
        .collect()
}
