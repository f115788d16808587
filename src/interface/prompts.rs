use std::collections::HashSet;

use dialoguer::{Confirm, Select};
use strsim::jaro_winkler;

use crate::catalog::MenuCatalog;
use crate::error::{KitchenError, Result};
use crate::models::{DishId, MealType};
use crate::planner::ResolvedDay;

const FUZZY_THRESHOLD: f64 = 0.7;

/// A dish the user may have meant.
#[derive(Debug, Clone, PartialEq)]
pub struct DishMatch {
    pub id: DishId,
    pub name: String,
    pub meal_type: MealType,
    pub score: f64,
}

/// Every dish that can be named: the resolved day first (set dishes
/// included), then the rest of the catalog. Ids are listed once.
fn dish_pool(catalog: &MenuCatalog, day: &ResolvedDay) -> Vec<(DishId, String, MealType)> {
    let mut seen = HashSet::new();
    let served = day.dishes.iter().map(|d| {
        let name = match catalog.find_dish(d.dish_id) {
            Some(known) if d.name.is_empty() => known.name.clone(),
            _ => d.name.clone(),
        };
        (d.dish_id, name, d.meal_type)
    });
    let rest = catalog
        .all_dishes()
        .map(|d| (d.id, d.name.clone(), d.meal_type));
    served
        .chain(rest)
        .filter(|(id, _, _)| seen.insert(*id))
        .collect()
}

/// Dishes matching `query`, best first.
///
/// A numeric query is a dish id. Otherwise an exact (case-insensitive) name
/// match wins outright, then Jaro-Winkler candidates above the threshold.
/// Dishes served on `day` rank ahead of the catalog on equal scores.
pub fn dish_candidates(catalog: &MenuCatalog, day: &ResolvedDay, query: &str) -> Vec<DishMatch> {
    let query = query.trim();
    let pool = dish_pool(catalog, day);
    let to_match = |(id, name, meal_type): (DishId, String, MealType), score| DishMatch {
        id,
        name,
        meal_type,
        score,
    };

    if let Ok(id) = query.parse::<DishId>() {
        return pool
            .into_iter()
            .filter(|(dish_id, _, _)| *dish_id == id)
            .map(|d| to_match(d, 1.0))
            .collect();
    }

    let needle = query.to_lowercase();
    let (exact, others): (Vec<_>, Vec<_>) = pool
        .into_iter()
        .partition(|(_, name, _)| name.to_lowercase() == needle);
    if !exact.is_empty() {
        return exact.into_iter().map(|d| to_match(d, 1.0)).collect();
    }

    let mut candidates: Vec<DishMatch> = others
        .into_iter()
        .map(|d| {
            let score = jaro_winkler(&d.1.to_lowercase(), &needle);
            to_match(d, score)
        })
        .filter(|m| m.score > FUZZY_THRESHOLD)
        .collect();
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    candidates
}

/// Resolve a dish from user input, confirming fuzzy matches interactively.
///
/// With `assume_yes`, the best candidate is taken without prompting.
pub fn prompt_dish(
    catalog: &MenuCatalog,
    day: &ResolvedDay,
    query: &str,
    assume_yes: bool,
) -> Result<DishMatch> {
    let mut candidates = dish_candidates(catalog, day, query);
    if candidates.is_empty() {
        return Err(KitchenError::DishNotFound(query.to_string()));
    }
    if assume_yes || (candidates.len() == 1 && candidates[0].score >= 1.0) {
        return Ok(candidates.swap_remove(0));
    }

    if candidates.len() == 1 {
        let best = candidates.swap_remove(0);
        let confirm = Confirm::new()
            .with_prompt(format!("Did you mean '{}' (#{})?", best.name, best.id))
            .default(true)
            .interact()?;
        return if confirm {
            Ok(best)
        } else {
            Err(KitchenError::DishNotFound(query.to_string()))
        };
    }

    candidates.truncate(5);
    let options: Vec<String> = candidates
        .iter()
        .map(|d| format!("#{} {} ({})", d.id, d.name, d.meal_type))
        .collect();
    let mut selection_options = options.clone();
    selection_options.push("None of these".to_string());

    let selection = Select::new()
        .with_prompt("Which dish was cooked?")
        .items(&selection_options)
        .default(0)
        .interact()?;

    if selection < candidates.len() {
        Ok(candidates.swap_remove(selection))
    } else {
        Err(KitchenError::DishNotFound(query.to_string()))
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
