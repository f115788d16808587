pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod planner;
pub mod state;

pub use catalog::MenuCatalog;
pub use error::{KitchenError, Result};
pub use planner::{CycleResolver, Demand};
pub use state::{CookingLedger, LedgerStore};
