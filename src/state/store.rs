use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{CookBatch, CookReceipt, CookedStats, Inventory, InventoryItem};

/// Persistent inventory balances and cooked-portion counters.
///
/// `apply_batch` is the unit of atomicity: the stats increment and every
/// deduction in the batch land together or not at all, and concurrent
/// batches touching the same ingredient never lose an update.
pub trait LedgerStore: Send + Sync {
    fn apply_batch(&self, batch: &CookBatch) -> Result<CookReceipt>;

    fn inventory(&self) -> Result<Inventory>;

    fn cooked_stats(&self, date: NaiveDate) -> Result<CookedStats>;

    /// Direct stock edit (delivery, stock-take). Replaces amount and unit.
    fn set_stock(&self, item: InventoryItem) -> Result<()>;
}

impl<S: LedgerStore + ?Sized> LedgerStore for &S {
    fn apply_batch(&self, batch: &CookBatch) -> Result<CookReceipt> {
        (**self).apply_batch(batch)
    }

    fn inventory(&self) -> Result<Inventory> {
        (**self).inventory()
    }

    fn cooked_stats(&self, date: NaiveDate) -> Result<CookedStats> {
        (**self).cooked_stats(date)
    }

    fn set_stock(&self, item: InventoryItem) -> Result<()> {
        (**self).set_stock(item)
    }
}
