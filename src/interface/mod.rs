pub mod export;
pub mod prompts;
pub mod render;

pub use export::{export_csv, export_demand_json, export_json, write_csv};
pub use prompts::{DishMatch, dish_candidates, prompt_dish, prompt_yes_no};
pub use render::{
    display_demand, display_inventory, display_menu, display_receipt, display_shopping_list,
};
