use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::tier::CalorieTier;

/// Dish identifier, unique across the menu days and the sixth-meal pool.
pub type DishId = u32;

/// Meal slot a dish is served in. Decides which tier multiplier scales it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    SecondBreakfast,
    Lunch,
    Snack,
    Dinner,
    SixthMeal,
    Unknown,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "BREAKFAST",
            MealType::SecondBreakfast => "SECOND_BREAKFAST",
            MealType::Lunch => "LUNCH",
            MealType::Snack => "SNACK",
            MealType::Dinner => "DINNER",
            MealType::SixthMeal => "SIXTH_MEAL",
            MealType::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for MealType {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "BREAKFAST" => MealType::Breakfast,
            "SECOND_BREAKFAST" => MealType::SecondBreakfast,
            "LUNCH" => MealType::Lunch,
            "SNACK" => MealType::Snack,
            "DINNER" => MealType::Dinner,
            "SIXTH_MEAL" => MealType::SixthMeal,
            _ => MealType::Unknown,
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw ingredient line. Catalog amounts are per single 1200-kcal portion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

/// A catalog dish.
///
/// `calorie_mappings` is the legacy eligibility mask: menu-day key ("1".."21")
/// to the kcal tiers that receive this dish on that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: DishId,
    pub name: String,
    pub meal_type: MealType,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calorie_mappings: Option<BTreeMap<String, Vec<u32>>>,
}

impl Dish {
    /// Whether the dish is produced for `tier` on `menu_day`.
    ///
    /// A dish with no mask entry for the day is eligible for every tier.
    pub fn is_eligible(&self, menu_day: u8, tier: CalorieTier) -> bool {
        self.calorie_mappings
            .as_ref()
            .and_then(|m| m.get(&menu_day.to_string()))
            .map(|tiers| tiers.contains(&tier.kcal()))
            .unwrap_or(true)
    }
}

/// One position of the fixed rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMenu {
    pub menu_number: u8,
    pub dishes: Vec<Dish>,
}

impl DailyMenu {
    pub fn find_dish(&self, id: DishId) -> Option<&Dish> {
        self.dishes.iter().find(|d| d.id == id)
    }
}
