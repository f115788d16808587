use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::dish::{DishId, Ingredient, MealType};
use crate::models::tier::CalorieTier;
use crate::planner::constants::MENU_CYCLE_DAYS;

pub type SetId = i64;

/// A dish placed into a set, optionally with its own ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetDish {
    pub dish_id: DishId,
    #[serde(default)]
    pub dish_name: String,
    pub meal_type: MealType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_ingredients: Option<Vec<Ingredient>>,
}

impl SetDish {
    /// The override ingredient list, if one was actually entered.
    ///
    /// An empty list is treated as "not overridden".
    pub fn custom_ingredients(&self) -> Option<&[Ingredient]> {
        self.custom_ingredients
            .as_deref()
            .filter(|ings| !ings.is_empty())
    }
}

/// The dishes a set serves to one tier on one menu day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieGroup {
    pub calories: CalorieTier,
    #[serde(default)]
    pub dishes: Vec<SetDish>,
}

/// An admin-maintained override layer over the catalog.
///
/// Coverage is sparse: menu days without groups fall back to the catalog.
/// Payloads are validated once on load: unknown day keys and groups whose
/// calories are not a tier are dropped with a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawMenuSet")]
pub struct MenuSet {
    pub id: SetId,
    pub name: String,
    pub is_active: bool,
    pub calorie_groups: BTreeMap<u8, Vec<CalorieGroup>>,
}

impl MenuSet {
    pub fn new(id: SetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_active: false,
            calorie_groups: BTreeMap::new(),
        }
    }

    /// The override for `menu_day`, only when it holds at least one group.
    pub fn day_groups(&self, menu_day: u8) -> Option<&[CalorieGroup]> {
        self.calorie_groups
            .get(&menu_day)
            .map(Vec::as_slice)
            .filter(|groups| !groups.is_empty())
    }

    pub fn configured_days(&self) -> Vec<u8> {
        self.calorie_groups
            .iter()
            .filter(|(_, groups)| !groups.is_empty())
            .map(|(day, _)| *day)
            .collect()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCalorieGroup {
    calories: u32,
    #[serde(default)]
    dishes: Vec<SetDish>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMenuSet {
    id: SetId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    calorie_groups: BTreeMap<String, Vec<RawCalorieGroup>>,
}

impl From<RawMenuSet> for MenuSet {
    fn from(raw: RawMenuSet) -> Self {
        let mut calorie_groups = BTreeMap::new();

        for (key, raw_groups) in raw.calorie_groups {
            let day = match key.trim().parse::<u8>() {
                Ok(d) if d >= 1 && i64::from(d) <= MENU_CYCLE_DAYS => d,
                _ => {
                    warn!(set_id = raw.id, day = %key, "dropping set day outside the menu cycle");
                    continue;
                }
            };

            let groups: Vec<CalorieGroup> = raw_groups
                .into_iter()
                .filter_map(|g| match CalorieTier::from_kcal(g.calories) {
                    Some(calories) => Some(CalorieGroup {
                        calories,
                        dishes: g.dishes,
                    }),
                    None => {
                        warn!(
                            set_id = raw.id,
                            day,
                            calories = g.calories,
                            "dropping calorie group with unknown tier"
                        );
                        None
                    }
                })
                .collect();

            calorie_groups.insert(day, groups);
        }

        Self {
            id: raw.id,
            name: raw.name,
            is_active: raw.is_active,
            calorie_groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET_JSON: &str = r#"{
        "id": 4,
        "name": "Ramazon",
        "isActive": true,
        "calorieGroups": {
            "5": [
                {"calories": 1200, "dishes": [
                    {"dishId": 23, "dishName": "Dimlama", "mealType": "LUNCH"}
                ]},
                {"calories": 1700, "dishes": []}
            ],
            "6": [],
            "40": [{"calories": 1200, "dishes": []}]
        }
    }"#;

    #[test]
    fn test_boundary_validation_drops_bad_rows() {
        let set: MenuSet = serde_json::from_str(SET_JSON).unwrap();
        assert!(set.is_active);

        let day5 = set.day_groups(5).unwrap();
        assert_eq!(day5.len(), 1);
        assert_eq!(day5[0].calories, CalorieTier::Kcal1200);

        assert!(!set.calorie_groups.contains_key(&40));
        assert!(set.day_groups(6).is_none());
        assert_eq!(set.configured_days(), vec![5]);
    }

    #[test]
    fn test_empty_custom_ingredients_count_as_absent() {
        let dish = SetDish {
            dish_id: 1,
            dish_name: "Omlet".to_string(),
            meal_type: MealType::Breakfast,
            custom_ingredients: Some(Vec::new()),
        };
        assert!(dish.custom_ingredients().is_none());
    }

    #[test]
    fn test_serialized_set_reloads() {
        let set: MenuSet = serde_json::from_str(SET_JSON).unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.contains("\"calorieGroups\":{\"5\""));
        let again: MenuSet = serde_json::from_str(&json).unwrap();
        assert_eq!(again, set);
    }
}
