use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::error::{KitchenError, Result};
use crate::models::{CalorieTier, DishId};
use crate::planner::DishQuantities;

/// Kitchen planning CLI for a 21-day rotating menu: demand, shopping lists and cooking.
#[derive(Parser, Debug)]
#[command(name = "kitchen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the kitchen config JSON file.
    #[arg(short, long, default_value = "kitchen.json")]
    pub config: PathBuf,
}

/// Which dates and clients to plan for.
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// First date to plan (defaults to today in the reference timezone).
    #[arg(short, long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    /// Number of consecutive days.
    #[arg(long, default_value_t = 1)]
    pub days: u32,

    /// Clients per tier, e.g. "1200=3,1600=2". Without it the roster file is used.
    #[arg(long)]
    pub clients: Option<String>,

    /// Requested portions for a dish, e.g. "3=12.5". Repeatable.
    #[arg(long = "qty")]
    pub quantities: Vec<String>,

    /// Write the ingredient table to a CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the result to a JSON file.
    #[arg(long)]
    pub json: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the menu day and dishes served on a date.
    Menu {
        #[arg(short, long, value_parser = date_arg)]
        date: Option<NaiveDate>,
    },

    /// Aggregate ingredient demand.
    Demand(PlanArgs),

    /// Demand minus current stock.
    Shopping(PlanArgs),

    /// Record a cooked batch and deduct its ingredients.
    Cook {
        /// Dish id or name (fuzzy matched).
        #[arg(long)]
        dish: String,

        /// Calorie tier: 1200, 1600, 2000, 2500 or 3000.
        #[arg(long, value_parser = parse_tier)]
        tier: CalorieTier,

        /// Portions cooked.
        #[arg(long)]
        portions: u32,

        #[arg(short, long, value_parser = date_arg)]
        date: Option<NaiveDate>,

        /// Menu set to resolve the dish against (defaults to the active set).
        #[arg(long = "set")]
        set_id: Option<i64>,

        /// Accept the best dish match without prompting.
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or edit stock.
    Stock {
        /// Replace one stock line: NAME AMOUNT UNIT.
        #[arg(long = "put", num_args = 3, value_names = ["NAME", "AMOUNT", "UNIT"])]
        put: Option<Vec<String>>,

        /// Load stock lines from an inventory JSON file.
        #[arg(long)]
        import: Option<PathBuf>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Menu { date: None }
    }
}

fn parse_tier(s: &str) -> std::result::Result<CalorieTier, String> {
    s.parse::<CalorieTier>().map_err(|e| e.to_string())
}

/// Parse a calendar date written as YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| KitchenError::InvalidDate(format!("'{}': {}", s, e)))
}

fn date_arg(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

/// Parse repeated `ID=PORTIONS` pairs. Later pairs for the same id win.
pub fn parse_quantities(pairs: &[String]) -> Result<Option<DishQuantities>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let mut quantities = DishQuantities::new();
    for pair in pairs {
        let (id, qty) = pair.split_once('=').ok_or_else(|| {
            KitchenError::InvalidInput(format!("Expected DISH_ID=PORTIONS, got '{}'", pair))
        })?;
        let id: DishId = id
            .trim()
            .parse()
            .map_err(|_| KitchenError::InvalidInput(format!("Invalid dish id in '{}'", pair)))?;
        let qty: f64 = qty
            .trim()
            .parse()
            .map_err(|_| KitchenError::InvalidInput(format!("Invalid portions in '{}'", pair)))?;
        quantities.insert(id, qty);
    }
    Ok(Some(quantities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantities() {
        let pairs = vec!["3=12.5".to_string(), "8 = 4".to_string(), "3=10".to_string()];
        let q = parse_quantities(&pairs).unwrap().unwrap();
        assert_eq!(q[&3], 10.0);
        assert_eq!(q[&8], 4.0);
        assert!(parse_quantities(&[]).unwrap().is_none());
        assert!(parse_quantities(&["x=1".to_string()]).is_err());
    }

    #[test]
    fn test_cook_command_parses() {
        let cli = Cli::parse_from([
            "kitchen", "cook", "--dish", "Lag'mon", "--tier", "1600", "--portions", "4",
            "--date", "2024-01-02", "--yes",
        ]);
        match cli.command {
            Some(Command::Cook {
                tier,
                portions,
                date,
                yes,
                ..
            }) => {
                assert_eq!(tier, CalorieTier::Kcal1600);
                assert_eq!(portions, 4);
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 2));
                assert!(yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 2024-02-29 ").unwrap(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(matches!(parse_date("2023-02-29"), Err(KitchenError::InvalidDate(_))));
        assert!(matches!(parse_date("29.02.2024"), Err(KitchenError::InvalidDate(_))));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let result = Cli::try_parse_from(["kitchen", "menu", "--date", "2024-13-01"]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Invalid date"), "{}", err);
    }

    #[test]
    fn test_bad_tier_is_rejected() {
        let result = Cli::try_parse_from([
            "kitchen", "cook", "--dish", "3", "--tier", "1700", "--portions", "1",
        ]);
        assert!(result.is_err());
    }
}
