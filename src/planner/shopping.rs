use crate::models::{IngredientMap, IngredientTotal, Inventory};
use crate::planner::scaling::round1;

/// What must be bought to cover `demand` from current stock.
///
/// Only positive shortfalls are listed, rounded to one decimal. Stock with
/// no matching demand is ignored.
pub fn shopping_list(demand: &IngredientMap, inventory: &Inventory) -> IngredientMap {
    demand
        .iter()
        .filter_map(|(name, total)| {
            let needed = round1(total.amount - inventory.amount_of(name));
            (needed > 0.0).then(|| {
                (
                    name.clone(),
                    IngredientTotal {
                        amount: needed,
                        unit: total.unit.clone(),
                    },
                )
            })
        })
        .collect()
}
