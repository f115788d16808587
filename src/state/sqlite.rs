use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, TransactionBehavior, params};
use tracing::{debug, warn};

use crate::error::{KitchenError, Result};
use crate::models::{
    CalorieTier, CookBatch, CookReceipt, CookedStats, DishId, Inventory, InventoryItem,
};
use crate::state::store::LedgerStore;

pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS inventory (
    name   TEXT PRIMARY KEY,
    amount REAL NOT NULL,
    unit   TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS cooked_stats (
    cook_date TEXT    NOT NULL,
    dish_id   INTEGER NOT NULL,
    tier      INTEGER NOT NULL,
    portions  INTEGER NOT NULL,
    PRIMARY KEY (cook_date, dish_id, tier)
);
"#;

/// SQLite-backed ledger.
///
/// Each batch runs in one `BEGIN IMMEDIATE` transaction and every balance
/// change is a relative `UPDATE ... SET amount = amount - ?`, so writers from
/// other connections or processes never overwrite each other's deductions.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// Wrap an existing connection, applying the busy timeout and schema.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self> {
        let store = Self { conn };
        {
            let conn = store.get_conn()?;
            conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
            conn.execute_batch(SCHEMA)?;
        }
        Ok(store)
    }

    /// How long a writer waits for the database lock before giving up.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.get_conn()?.busy_timeout(timeout)?;
        Ok(())
    }

    /// Seed or replace stock from a snapshot, in one transaction.
    pub fn import_inventory(&self, inventory: &Inventory) -> Result<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        for item in inventory.iter() {
            tx.execute(
                "INSERT INTO inventory (name, amount, unit) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET amount = excluded.amount, unit = excluded.unit",
                params![item.name, item.amount, item.unit],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| KitchenError::LockPoisoned(e.to_string()))
    }
}

/// BUSY and LOCKED mean another writer held the database; report them as
/// retryable contention for the dish being cooked.
fn db_error(dish_id: DishId, err: rusqlite::Error) -> KitchenError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _)
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) =>
        {
            KitchenError::Contention {
                dish_id,
                reason: err.to_string(),
            }
        }
        _ => KitchenError::Database(err),
    }
}

impl LedgerStore for SqliteStore {
    fn apply_batch(&self, batch: &CookBatch) -> Result<CookReceipt> {
        let on_err = move |e| db_error(batch.dish_id, e);
        let date = batch.date.format(DATE_FORMAT).to_string();

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(on_err)?;

        let cooked_total: u32 = tx
            .query_row(
                "INSERT INTO cooked_stats (cook_date, dish_id, tier, portions)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(cook_date, dish_id, tier)
                 DO UPDATE SET portions = portions + excluded.portions
                 RETURNING portions",
                params![date, batch.dish_id, batch.tier.kcal(), batch.portions],
                |row| row.get(0),
            )
            .map_err(on_err)?;

        let mut remaining = BTreeMap::new();
        for ing in &batch.deductions {
            let left: f64 = tx
                .query_row(
                    "INSERT INTO inventory (name, amount, unit) VALUES (?1, -?2, ?3)
                     ON CONFLICT(name) DO UPDATE SET amount = amount - ?2
                     RETURNING amount",
                    params![ing.name, ing.amount, ing.unit],
                    |row| row.get(0),
                )
                .map_err(on_err)?;
            remaining.insert(ing.name.clone(), left);
        }

        tx.commit().map_err(on_err)?;
        debug!(
            dish_id = batch.dish_id,
            tier = batch.tier.kcal(),
            cooked_total,
            "batch committed"
        );

        Ok(CookReceipt {
            date: batch.date,
            dish_id: batch.dish_id,
            tier: batch.tier,
            cooked_total,
            deductions: batch.deductions.clone(),
            remaining,
            resolved: true,
        })
    }

    fn inventory(&self) -> Result<Inventory> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT name, amount, unit FROM inventory ORDER BY name")?;
        let items = stmt
            .query_map([], |row| {
                Ok(InventoryItem {
                    name: row.get(0)?,
                    amount: row.get(1)?,
                    unit: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(Inventory::from_items(items))
    }

    fn cooked_stats(&self, date: NaiveDate) -> Result<CookedStats> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT dish_id, tier, portions FROM cooked_stats WHERE cook_date = ?1",
        )?;
        let rows = stmt
            .query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
                Ok((
                    row.get::<_, DishId>(0)?,
                    row.get::<_, u32>(1)?,
                    row.get::<_, u32>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stats = CookedStats::default();
        for (dish_id, kcal, portions) in rows {
            match CalorieTier::from_kcal(kcal) {
                Some(tier) => {
                    stats.record(dish_id, tier, portions);
                }
                None => warn!(dish_id, kcal, "skipping cooked row with unknown tier"),
            }
        }
        Ok(stats)
    }

    fn set_stock(&self, item: InventoryItem) -> Result<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO inventory (name, amount, unit) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET amount = excluded.amount, unit = excluded.unit",
            params![item.name, item.amount, item.unit],
        )?;
        Ok(())
    }
}
