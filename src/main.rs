use std::path::Path;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;

use menu_cycle_kitchen::catalog::MenuCatalog;
use menu_cycle_kitchen::cli::{Cli, Command, PlanArgs, parse_quantities};
use menu_cycle_kitchen::config::{KitchenConfig, StoreKind};
use menu_cycle_kitchen::error::{KitchenError, Result};
use menu_cycle_kitchen::interface::{
    display_demand, display_inventory, display_menu, display_receipt, display_shopping_list,
    export_csv, export_demand_json, export_json, prompt_dish, prompt_yes_no,
};
use menu_cycle_kitchen::logging;
use menu_cycle_kitchen::models::{CalorieTier, ClientDistribution, InventoryItem, SetId};
use menu_cycle_kitchen::planner::{
    CycleResolver, Demand, aggregate_span, resolve_day, sixth_meal_index, shopping_list,
};
use menu_cycle_kitchen::state::{
    CookingLedger, LedgerStore, MemoryStore, SetRegistry, SqliteStore, load_inventory,
    load_roster, load_sets,
};

fn main() {
    logging::init();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = KitchenConfig::load(&cli.config)?;
    let command = cli.command.unwrap_or_default();

    let sets = load_registry(&config.sets_path)?;
    let resolver = config.resolver();
    let catalog = MenuCatalog::builtin();

    match command {
        Command::Menu { date } => cmd_menu(&config, &sets, &resolver, catalog, date),
        Command::Demand(args) => {
            let demand = plan_demand(&config, &sets, &resolver, catalog, &args)?;
            display_demand("Ingredient Demand", &demand);
            if let Some(path) = &args.csv {
                export_csv(&demand.items, path)?;
                println!("Demand written to {}", path.display());
            }
            if let Some(path) = &args.json {
                export_demand_json(&demand, path)?;
                println!("Demand written to {}", path.display());
            }
            Ok(())
        }
        Command::Shopping(args) => cmd_shopping(&config, &sets, &resolver, catalog, &args),
        Command::Cook {
            dish,
            tier,
            portions,
            date,
            set_id,
            yes,
        } => cmd_cook(
            &config, &sets, resolver, catalog, &dish, tier, portions, date, set_id, yes,
        ),
        Command::Stock { put, import } => cmd_stock(&config, put, import.as_deref()),
    }
}

/// Ledger backend chosen by config.
enum Backend {
    Json(MemoryStore),
    Sqlite(SqliteStore),
}

impl Backend {
    fn open(config: &KitchenConfig) -> Result<Self> {
        Ok(match config.store {
            StoreKind::Json => Backend::Json(MemoryStore::open(&config.state_path)?),
            StoreKind::Sqlite => Backend::Sqlite(SqliteStore::open(&config.database_path)?),
        })
    }

    fn store(&self) -> &dyn LedgerStore {
        match self {
            Backend::Json(store) => store,
            Backend::Sqlite(store) => store,
        }
    }

}

fn load_registry(path: &Path) -> Result<SetRegistry> {
    if !path.exists() {
        return Ok(SetRegistry::default());
    }
    let sets = load_sets(path)?;
    info!(count = sets.len(), path = %path.display(), "loaded menu sets");
    Ok(SetRegistry::new(sets))
}

/// Show what is served on a date.
fn cmd_menu(
    config: &KitchenConfig,
    sets: &SetRegistry,
    resolver: &CycleResolver,
    catalog: &MenuCatalog,
    date: Option<NaiveDate>,
) -> Result<()> {
    let date = date.unwrap_or_else(|| resolver.today());
    let menu_day = resolver.menu_day_of(date);
    let active = sets.active(config.active_set_id)?;

    let day = resolve_day(catalog, menu_day, active);
    display_menu(date, &day, sixth_meal_index(menu_day));
    Ok(())
}

/// Demand over the requested dates, with clients from `--clients` or the roster.
fn plan_demand(
    config: &KitchenConfig,
    sets: &SetRegistry,
    resolver: &CycleResolver,
    catalog: &MenuCatalog,
    args: &PlanArgs,
) -> Result<Demand> {
    let start = args.date.unwrap_or_else(|| resolver.today());
    let dates = resolver.span(start, args.days.max(1));
    let quantities = parse_quantities(&args.quantities)?;
    let active = sets.active(config.active_set_id)?;

    let demand = match &args.clients {
        Some(spec) => {
            let clients = ClientDistribution::parse(spec)?;
            aggregate_span(
                catalog,
                resolver,
                &dates,
                |_| clients.clone(),
                quantities.as_ref(),
                active,
            )
        }
        None => {
            if !config.roster_path.exists() {
                return Err(KitchenError::InvalidInput(format!(
                    "no --clients given and roster file {} not found",
                    config.roster_path.display()
                )));
            }
            let roster = load_roster(&config.roster_path)?;
            aggregate_span(
                catalog,
                resolver,
                &dates,
                |date| ClientDistribution::from_roster(&roster, date),
                quantities.as_ref(),
                active,
            )
        }
    };
    Ok(demand)
}

fn cmd_shopping(
    config: &KitchenConfig,
    sets: &SetRegistry,
    resolver: &CycleResolver,
    catalog: &MenuCatalog,
    args: &PlanArgs,
) -> Result<()> {
    let demand = plan_demand(config, sets, resolver, catalog, args)?;
    let backend = Backend::open(config)?;
    let inventory = backend.store().inventory()?;

    let list = shopping_list(&demand.items, &inventory);
    display_shopping_list(&list);
    if demand.is_partial() {
        display_demand("Demand (partial)", &demand);
    }

    if let Some(path) = &args.csv {
        export_csv(&list, path)?;
        println!("Shopping list written to {}", path.display());
    }
    if let Some(path) = &args.json {
        export_json(&list, path)?;
        println!("Shopping list written to {}", path.display());
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_cook(
    config: &KitchenConfig,
    sets: &SetRegistry,
    resolver: CycleResolver,
    catalog: &MenuCatalog,
    dish_query: &str,
    tier: CalorieTier,
    portions: u32,
    date: Option<NaiveDate>,
    set_id: Option<SetId>,
    yes: bool,
) -> Result<()> {
    let date = date.unwrap_or_else(|| resolver.today());
    let set = match set_id {
        Some(id) => Some(sets.get(id).ok_or(KitchenError::SetNotFound(id))?),
        None => sets.active(config.active_set_id)?,
    };
    let day = resolve_day(catalog, resolver.menu_day_of(date), set);
    let dish = prompt_dish(catalog, &day, dish_query, yes)?;
    let set_id = set.map(|s| s.id);

    if !yes {
        let go = prompt_yes_no(
            &format!(
                "Record {} portions of '{}' for {} kcal on {}?",
                portions, dish.name, tier, date
            ),
            true,
        )?;
        if !go {
            println!("Nothing recorded.");
            return Ok(());
        }
    }

    let backend = Backend::open(config)?;
    let ledger = CookingLedger::new(catalog, sets, resolver, backend.store());
    let receipt = ledger.record_cooked(date, dish.id, tier, portions, set_id)?;

    display_receipt(&receipt);
    Ok(())
}

fn cmd_stock(config: &KitchenConfig, put: Option<Vec<String>>, import: Option<&Path>) -> Result<()> {
    let backend = Backend::open(config)?;
    let store = backend.store();

    if let Some(path) = import {
        let inventory = load_inventory(path)?;
        for item in inventory.iter() {
            store.set_stock(item.clone())?;
        }
        println!("Imported {} stock lines.", inventory.len());
    }

    if let Some(fields) = put {
        let [name, amount, unit] = <[String; 3]>::try_from(fields)
            .map_err(|_| KitchenError::InvalidInput("expected NAME AMOUNT UNIT".to_string()))?;
        let amount: f64 = amount
            .parse()
            .map_err(|_| KitchenError::InvalidInput(format!("Invalid amount: {}", amount)))?;
        store.set_stock(InventoryItem { name, amount, unit })?;
    }

    display_inventory(&store.inventory()?);
    Ok(())
}
