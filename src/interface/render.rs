use chrono::NaiveDate;

use crate::models::{CookReceipt, IngredientMap, Inventory};
use crate::planner::{DaySource, Demand, ResolvedDay};

/// Display what is served on a date, per dish with the tiers receiving it.
pub fn display_menu(date: NaiveDate, day: &ResolvedDay, sixth_index: usize) {
    println!();
    match day.source {
        DaySource::Catalog => println!("=== {} - menu day {} ===", date, day.menu_day),
        DaySource::Override(id) => {
            println!("=== {} - menu day {} (set #{}) ===", date, day.menu_day, id)
        }
    }
    println!("Sixth meal pool index: {}", sixth_index);
    println!();

    let max_name_len = day.dishes.iter().map(|d| d.name.len()).max().unwrap_or(10);

    for dish in &day.dishes {
        let tiers: Vec<String> = dish.tiers.iter().map(|t| t.to_string()).collect();
        let marker = if dish.source.is_resolved() {
            ""
        } else {
            "  [no ingredients]"
        };
        println!(
            "  #{:<4} {:<17} {:<width$}  {}{}",
            dish.dish_id,
            dish.meal_type.as_str(),
            dish.name,
            tiers.join("/"),
            marker,
            width = max_name_len
        );
    }
    println!();
}

fn display_items(items: &IngredientMap) {
    let max_name_len = items.keys().map(|n| n.len()).max().unwrap_or(10);
    for (name, total) in items {
        println!(
            "  {:<width$}  {:>9.1} {}",
            name,
            total.amount,
            total.unit,
            width = max_name_len
        );
    }
}

/// Display aggregated demand, flagging dishes that contributed nothing.
pub fn display_demand(title: &str, demand: &Demand) {
    if demand.is_empty() && !demand.is_partial() {
        println!("{}: (nothing to prepare)", title);
        return;
    }

    println!();
    println!("=== {} ({} ingredients) ===", title, demand.items.len());
    println!();
    display_items(&demand.items);

    if demand.is_partial() {
        let ids: Vec<String> = demand.unresolved.iter().map(|id| format!("#{}", id)).collect();
        println!();
        println!("Warning: no ingredients found for {}", ids.join(", "));
    }
    println!();
}

pub fn display_shopping_list(list: &IngredientMap) {
    if list.is_empty() {
        println!("Shopping list: (stock covers everything)");
        return;
    }

    println!();
    println!("=== Shopping List ({} items) ===", list.len());
    println!();
    display_items(list);
    println!();
}

pub fn display_inventory(inventory: &Inventory) {
    if inventory.is_empty() {
        println!("Stock: (empty)");
        return;
    }

    println!();
    println!("=== Stock ({} items) ===", inventory.len());
    println!();
    let max_name_len = inventory.iter().map(|i| i.name.len()).max().unwrap_or(10);
    for item in inventory.iter() {
        let flag = if item.amount < 0.0 { "  [shortfall]" } else { "" };
        println!(
            "  {:<width$}  {:>9.1} {}{}",
            item.name,
            item.amount,
            item.unit,
            flag,
            width = max_name_len
        );
    }
    println!();
}

pub fn display_receipt(receipt: &CookReceipt) {
    println!();
    println!(
        "Recorded dish #{} for {} kcal on {}: {} portions so far today",
        receipt.dish_id, receipt.tier, receipt.date, receipt.cooked_total
    );
    if !receipt.resolved {
        println!("No ingredients known for this dish; stock left unchanged.");
        return;
    }
    for ing in &receipt.deductions {
        let left = receipt.remaining.get(&ing.name).copied().unwrap_or(0.0);
        println!(
            "  -{:.1} {} {} (left: {:.1})",
            ing.amount, ing.unit, ing.name, left
        );
    }
    println!();
}
