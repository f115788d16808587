use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::MenuCatalog;
use crate::models::{ClientDistribution, DishId, IngredientMap, IngredientTotal, MenuSet};
use crate::planner::cycle::CycleResolver;
use crate::planner::overrides::{IngredientSource, resolve_day};
use crate::planner::scaling::{round1, scale};

/// Requested portions per dish; dishes not listed default to one per client.
pub type DishQuantities = BTreeMap<DishId, f64>;

/// Aggregated ingredient demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Demand {
    pub items: IngredientMap,
    /// Set dishes that resolved to no ingredients and contributed nothing.
    pub unresolved: BTreeSet<DishId>,
}

impl Demand {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when some dish was skipped for lack of ingredients.
    pub fn is_partial(&self) -> bool {
        !self.unresolved.is_empty()
    }

    pub fn amount_of(&self, name: &str) -> f64 {
        self.items.get(name).map(|t| t.amount).unwrap_or(0.0)
    }

    /// Fold another demand into this one, rounding at every merge.
    pub fn absorb(&mut self, other: Demand) {
        for (name, total) in other.items {
            merge_ingredient(&mut self.items, &name, total.amount, &total.unit);
        }
        self.unresolved.extend(other.unresolved);
    }
}

/// Add `amount` under `name`. Existing entries are re-rounded to one decimal
/// on every merge, so totals depend on fold order. The first unit seen wins.
pub fn merge_ingredient(map: &mut IngredientMap, name: &str, amount: f64, unit: &str) {
    match map.get_mut(name) {
        Some(total) => total.amount = round1(total.amount + amount),
        None => {
            map.insert(
                name.to_string(),
                IngredientTotal {
                    amount,
                    unit: unit.to_string(),
                },
            );
        }
    }
}

/// Ingredient demand for one menu day.
///
/// Every dish's requested quantity (default: one per client) is split across
/// the tiers it is served to in proportion to each tier's client count, then
/// scaled and merged. Zero clients yields an empty demand.
pub fn aggregate(
    catalog: &MenuCatalog,
    menu_day: u8,
    clients: &ClientDistribution,
    quantities: Option<&DishQuantities>,
    active_set: Option<&MenuSet>,
) -> Demand {
    let total_clients = clients.total();
    if total_clients == 0 {
        return Demand::default();
    }
    let total = f64::from(total_clients);

    let day = resolve_day(catalog, menu_day, active_set);
    let mut demand = Demand::default();

    for dish in &day.dishes {
        if let IngredientSource::Unresolved(id) = dish.source {
            warn!(dish_id = id, menu_day, "set dish has no ingredients; skipped in demand");
            demand.unresolved.insert(id);
            continue;
        }

        let dish_qty = quantities
            .and_then(|q| q.get(&dish.dish_id))
            .copied()
            .unwrap_or(total)
            .max(0.0);

        for &tier in &dish.tiers {
            let count = clients.count(tier);
            if count == 0 {
                continue;
            }
            let portions = (dish_qty / total) * f64::from(count);
            for ing in scale(dish.source.ingredients(), tier, dish.meal_type, portions) {
                merge_ingredient(&mut demand.items, &ing.name, ing.amount, &ing.unit);
            }
        }
    }

    debug!(
        menu_day,
        clients = total_clients,
        ingredients = demand.items.len(),
        "aggregated day demand"
    );
    demand
}

/// Demand summed over several dates.
///
/// `clients_for` supplies each date's distribution, since delivery days
/// differ per client. Days are folded in the order given.
pub fn aggregate_span<F>(
    catalog: &MenuCatalog,
    resolver: &CycleResolver,
    dates: &[NaiveDate],
    mut clients_for: F,
    quantities: Option<&DishQuantities>,
    active_set: Option<&MenuSet>,
) -> Demand
where
    F: FnMut(NaiveDate) -> ClientDistribution,
{
    let mut demand = Demand::default();
    for &date in dates {
        let menu_day = resolver.menu_day_of(date);
        let clients = clients_for(date);
        demand.absorb(aggregate(catalog, menu_day, &clients, quantities, active_set));
    }
    demand
}
