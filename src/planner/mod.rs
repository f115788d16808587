pub mod constants;
pub mod cycle;
pub mod demand;
pub mod overrides;
pub mod scaling;
pub mod shopping;

pub use constants::*;
pub use cycle::{CycleResolver, sixth_meal_index};
pub use demand::{Demand, DishQuantities, aggregate, aggregate_span, merge_ingredient};
pub use overrides::{
    DaySource, IngredientSource, ResolvedDay, ResolvedDish, resolve_day, resolve_set_dish,
};
pub use scaling::{round1, scale, scale_for_kcal};
pub use shopping::shopping_list;
