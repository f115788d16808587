pub mod client;
pub mod dish;
pub mod inventory;
pub mod ledger;
pub mod set;
pub mod tier;

pub use client::ClientRecord;
pub use dish::{DailyMenu, Dish, DishId, Ingredient, MealType};
pub use inventory::{IngredientMap, IngredientTotal, Inventory, InventoryItem};
pub use ledger::{CookBatch, CookReceipt, CookedStats};
pub use set::{CalorieGroup, MenuSet, SetDish, SetId};
pub use tier::{CalorieTier, ClientDistribution, TierMultipliers};
