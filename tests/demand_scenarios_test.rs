use std::collections::BTreeSet;

use assert_float_eq::assert_float_absolute_eq;
use chrono::{Days, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use menu_cycle_kitchen::catalog::MenuCatalog;
use menu_cycle_kitchen::models::{
    CalorieGroup, CalorieTier, ClientDistribution, ClientRecord, Ingredient, InventoryItem,
    Inventory, MealType, MenuSet, SetDish,
};
use menu_cycle_kitchen::planner::{
    CycleResolver, DishQuantities, aggregate, aggregate_span, resolve_day, round1, scale,
    shopping_list,
};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn only(tier: CalorieTier, count: u32) -> ClientDistribution {
    ClientDistribution::new().with(tier, count)
}

fn random_clients(rng: &mut StdRng) -> ClientDistribution {
    let mut dist = ClientDistribution::new();
    for tier in CalorieTier::ALL {
        dist.set(tier, rng.gen_range(0..8));
    }
    dist
}

/// A set that serves one dish with one 10-unit ingredient to every tier on `day`.
fn single_dish_set(day: u8, meal_type: MealType) -> MenuSet {
    let mut set = MenuSet::new(1, "Bitta taom");
    set.calorie_groups.insert(
        day,
        CalorieTier::ALL
            .into_iter()
            .map(|tier| CalorieGroup {
                calories: tier,
                dishes: vec![SetDish {
                    dish_id: 500,
                    dish_name: "Sinov taomi".to_string(),
                    meal_type,
                    custom_ingredients: Some(vec![Ingredient::new("Sinov", 10.0, "gr")]),
                }],
            })
            .collect(),
    );
    set
}

#[test]
fn test_cycle_totality_and_wrap() {
    let resolver = CycleResolver::default();
    let mut rng = StdRng::seed_from_u64(21);

    for _ in 0..2000 {
        let offset: i64 = rng.gen_range(-50_000..50_000);
        let date = epoch() + chrono::Duration::days(offset);
        let day = resolver.menu_day_of(date);
        assert!((1..=21).contains(&day), "day {} for offset {}", day, offset);

        let earlier = date - chrono::Duration::days(21);
        assert_eq!(resolver.menu_day_of(earlier), day);
    }
    assert_eq!(
        resolver.menu_day_of(epoch().checked_sub_days(Days::new(21)).unwrap()),
        resolver.menu_day_of(epoch())
    );
}

#[test]
fn test_reference_tier_scaling_is_identity() {
    let catalog = MenuCatalog::builtin();
    for dish in catalog.all_dishes() {
        let scaled = scale(&dish.ingredients, CalorieTier::Kcal1200, dish.meal_type, 1.0);
        for (out, src) in scaled.iter().zip(&dish.ingredients) {
            if dish.meal_type == MealType::SixthMeal {
                assert_eq!(out.amount, 0.0, "sixth meal {} at 1200", dish.id);
            } else {
                assert_eq!(out.amount, src.amount, "dish {} {}", dish.id, src.name);
            }
        }
    }
}

#[test]
fn test_zero_clients_never_divides() {
    let catalog = MenuCatalog::builtin();
    let mut zeros = ClientDistribution::new();
    for tier in CalorieTier::ALL {
        zeros.set(tier, 0);
    }
    let mut quantities = DishQuantities::new();
    quantities.insert(3, 12.0);

    for day in 1..=21 {
        let demand = aggregate(catalog, day, &zeros, Some(&quantities), None);
        assert!(demand.is_empty());
        assert!(!demand.is_partial());
    }
}

#[test]
fn test_day_one_reference_tier() {
    let catalog = MenuCatalog::builtin();
    let demand = aggregate(catalog, 1, &only(CalorieTier::Kcal1200, 1), None, None);

    assert_eq!(demand.amount_of("Mol go'shti"), 85.7);
    assert_eq!(demand.items["Mol go'shti"].unit, "gr");
    // The sixth meal is present but contributes nothing at 1200.
    assert_eq!(demand.amount_of("Kefir"), 0.0);
    assert!(demand.items.contains_key("Kefir"));
}

#[test]
fn test_day_one_top_tier() {
    let catalog = MenuCatalog::builtin();
    let demand = aggregate(catalog, 1, &only(CalorieTier::Kcal3000, 1), None, None);

    assert_eq!(demand.amount_of("Mol go'shti"), 257.1);
    assert_eq!(demand.amount_of("Kefir"), 300.0);
}

#[test]
fn test_shopping_list_for_day_one_beef() {
    let catalog = MenuCatalog::builtin();
    let demand = aggregate(catalog, 1, &only(CalorieTier::Kcal3000, 1), None, None);
    let inventory = Inventory::from_items(vec![InventoryItem {
        name: "Mol go'shti".to_string(),
        amount: 200.0,
        unit: "gr".to_string(),
    }]);

    let list = shopping_list(&demand.items, &inventory);
    assert_eq!(list["Mol go'shti"].amount, 57.1);
    assert_eq!(list["Mol go'shti"].unit, "gr");
}

#[test]
fn test_portion_conservation() {
    let catalog = MenuCatalog::builtin();
    let mut rng = StdRng::seed_from_u64(7);
    let set = single_dish_set(4, MealType::Lunch);

    for _ in 0..300 {
        let clients = random_clients(&mut rng);
        if clients.total() == 0 {
            continue;
        }
        // With the default quantity every client gets exactly one portion,
        // so the total is the sum of per-tier scaled reference amounts.
        let exact: f64 = clients
            .iter()
            .map(|(tier, count)| 10.0 * tier.multipliers().lunch * f64::from(count))
            .sum();
        let served_tiers = clients.iter().filter(|(_, c)| *c > 0).count() as f64;

        let demand = aggregate(catalog, 4, &clients, None, Some(&set));
        assert_float_absolute_eq!(demand.amount_of("Sinov"), exact, 0.1 * served_tiers + 1e-9);
    }
}

#[test]
fn test_requested_quantity_is_split_by_share() {
    let catalog = MenuCatalog::builtin();
    let mut rng = StdRng::seed_from_u64(99);
    let set = single_dish_set(9, MealType::Breakfast);

    for _ in 0..200 {
        let clients = random_clients(&mut rng);
        if clients.total() == 0 {
            continue;
        }
        let total = f64::from(clients.total());
        let requested = round1(rng.gen_range(0.0..40.0));
        let mut quantities = DishQuantities::new();
        quantities.insert(500, requested);

        let exact: f64 = clients
            .iter()
            .map(|(tier, count)| {
                10.0 * tier.multipliers().breakfast * (requested / total) * f64::from(count)
            })
            .sum();
        let served_tiers = clients.iter().filter(|(_, c)| *c > 0).count() as f64;

        let demand = aggregate(catalog, 9, &clients, Some(&quantities), Some(&set));
        assert_float_absolute_eq!(demand.amount_of("Sinov"), exact, 0.1 * served_tiers + 1e-9);
    }
}

#[test]
fn test_override_replaces_rather_than_merges() {
    let catalog = MenuCatalog::builtin();
    let set = single_dish_set(5, MealType::Lunch);

    let catalog_ids: BTreeSet<u32> = resolve_day(catalog, 5, None)
        .dishes
        .iter()
        .map(|d| d.dish_id)
        .collect();
    let overridden = resolve_day(catalog, 5, Some(&set));

    assert!(overridden.dishes.iter().all(|d| d.dish_id == 500));
    assert!(overridden
        .dishes
        .iter()
        .all(|d| !catalog_ids.contains(&d.dish_id)));

    // Other days still come from the catalog.
    let other = resolve_day(catalog, 6, Some(&set));
    assert!(other.dishes.iter().all(|d| d.dish_id != 500));
}

#[test]
fn test_shopping_list_is_strictly_positive() {
    let catalog = MenuCatalog::builtin();
    let mut rng = StdRng::seed_from_u64(2024);

    for round in 0..50 {
        let day = (round % 21) as u8 + 1;
        let clients = random_clients(&mut rng);
        let demand = aggregate(catalog, day, &clients, None, None);

        let inventory = Inventory::from_items(demand.items.iter().map(|(name, total)| {
            InventoryItem {
                name: name.clone(),
                amount: round1(total.amount * rng.gen_range(0.0..2.0)),
                unit: total.unit.clone(),
            }
        }));

        let list = shopping_list(&demand.items, &inventory);
        for (name, need) in &list {
            assert!(need.amount > 0.0, "{} has {}", name, need.amount);
        }
        for item in inventory.iter() {
            if item.amount >= demand.amount_of(&item.name) {
                assert!(!list.contains_key(&item.name), "{} is covered", item.name);
            }
        }
    }
}

#[test]
fn test_week_of_roster_deliveries() {
    let catalog = MenuCatalog::builtin();
    let resolver = CycleResolver::default();
    let roster = vec![
        ClientRecord {
            name: "Aziza".to_string(),
            calories: 1350,
            active: true,
            delivery_days: vec![Weekday::Mon],
        },
        ClientRecord {
            name: "Bobur".to_string(),
            calories: 2900,
            active: false,
            delivery_days: vec![],
        },
    ];

    // 2024-01-01 is a Monday and menu day 1; only Aziza eats, only that day.
    let dates = resolver.span(epoch(), 7);
    let demand = aggregate_span(
        catalog,
        &resolver,
        &dates,
        |date| ClientDistribution::from_roster(&roster, date),
        None,
        None,
    );
    let day_one = aggregate(catalog, 1, &only(CalorieTier::Kcal1200, 1), None, None);

    assert_eq!(demand.items, day_one.items);
}
