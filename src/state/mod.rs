pub mod ledger;
pub mod manager;
pub mod persistence;
pub mod sets;
pub mod sqlite;
pub mod store;

pub use ledger::CookingLedger;
pub use manager::{KitchenState, MemoryStore};
pub use persistence::{
    load_inventory, load_kitchen_state, load_roster, load_sets, save_kitchen_state, save_sets,
};
pub use sets::SetRegistry;
pub use sqlite::SqliteStore;
pub use store::LedgerStore;
