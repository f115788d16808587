use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KitchenError, Result};
use crate::models::{CookBatch, DishId, CookReceipt, CookedStats, Inventory, InventoryItem};
use crate::state::persistence::{load_kitchen_state, save_kitchen_state};
use crate::state::store::LedgerStore;

/// Stock balances plus the per-date cooked counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KitchenState {
    inventory: Inventory,
    cooked: BTreeMap<NaiveDate, CookedStats>,
}

/// On-disk shape of [`KitchenState`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct KitchenStateFile {
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    #[serde(default)]
    pub cooked: BTreeMap<NaiveDate, CookedStats>,
}

impl KitchenState {
    pub fn new(inventory: Inventory) -> Self {
        Self {
            inventory,
            cooked: BTreeMap::new(),
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn cooked_stats(&self, date: NaiveDate) -> CookedStats {
        self.cooked.get(&date).cloned().unwrap_or_default()
    }

    pub fn set_stock(&mut self, item: InventoryItem) {
        self.inventory.upsert(item);
    }

    /// Record the batch and take its ingredients out of stock.
    pub fn apply(&mut self, batch: &CookBatch) -> CookReceipt {
        let cooked_total = self
            .cooked
            .entry(batch.date)
            .or_default()
            .record(batch.dish_id, batch.tier, batch.portions);

        let mut remaining = BTreeMap::new();
        for ing in &batch.deductions {
            let left = self.inventory.apply_delta(&ing.name, -ing.amount, &ing.unit);
            remaining.insert(ing.name.clone(), left);
        }

        CookReceipt {
            date: batch.date,
            dish_id: batch.dish_id,
            tier: batch.tier,
            cooked_total,
            deductions: batch.deductions.clone(),
            remaining,
            resolved: true,
        }
    }

    pub(crate) fn to_file(&self) -> KitchenStateFile {
        KitchenStateFile {
            inventory: self.inventory.to_items(),
            cooked: self.cooked.clone(),
        }
    }

    pub(crate) fn from_file(file: KitchenStateFile) -> Self {
        Self {
            inventory: Inventory::from_items(file.inventory),
            cooked: file.cooked,
        }
    }
}

const LOCK_ATTEMPTS: usize = 20;
const LOCK_RETRY_SLEEP: Duration = Duration::from_millis(25);

/// A JSON state file plus the sidecar file used to lock it across processes.
///
/// The lock lives in `<state>.lock` because saves replace the state file by
/// rename, which would drop a lock taken on the state file itself.
#[derive(Debug)]
struct StateFile {
    path: PathBuf,
    lock_path: PathBuf,
}

impl StateFile {
    fn new(path: &Path) -> Self {
        let mut lock_path = OsString::from(path.as_os_str());
        lock_path.push(".lock");
        Self {
            path: path.to_path_buf(),
            lock_path: PathBuf::from(lock_path),
        }
    }

    /// Exclusive lock, retried briefly. `None` if another holder kept it.
    fn acquire(&self) -> Result<Option<File>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)?;

        let contended = fs2::lock_contended_error().kind();
        for _ in 0..LOCK_ATTEMPTS {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(Some(file)),
                Err(e) if e.kind() == contended => thread::sleep(LOCK_RETRY_SLEEP),
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }

    fn load(&self) -> Result<KitchenState> {
        if self.path.exists() {
            load_kitchen_state(&self.path)
        } else {
            Ok(KitchenState::default())
        }
    }
}

/// Ledger store over a [`KitchenState`].
///
/// Threads are serialised by one mutex. When opened on a file, every
/// operation also holds an exclusive file lock from reload through the
/// atomic save, so separate processes never overwrite each other's batches.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<KitchenState>,
    file: Option<StateFile>,
}

impl MemoryStore {
    pub fn new(state: KitchenState) -> Self {
        Self {
            state: Mutex::new(state),
            file: None,
        }
    }

    /// Back the store by a JSON state file; a missing file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = Self {
            state: Mutex::new(KitchenState::default()),
            file: Some(StateFile::new(path.as_ref())),
        };
        // Surface a malformed file now rather than on the first cook.
        store.with_state(false, state_locked, |_| ())?;
        Ok(store)
    }

    pub fn snapshot(&self) -> Result<KitchenState> {
        self.with_state(false, state_locked, |state| state.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, KitchenState>> {
        self.state
            .lock()
            .map_err(|e| KitchenError::LockPoisoned(e.to_string()))
    }

    /// Run `f` against the current state, reloading it from the file first
    /// and writing it back afterwards when `write` is set.
    fn with_state<T>(
        &self,
        write: bool,
        busy: impl FnOnce(&Path) -> KitchenError,
        f: impl FnOnce(&mut KitchenState) -> T,
    ) -> Result<T> {
        let mut state = self.lock()?;
        let Some(file) = &self.file else {
            return Ok(f(&mut state));
        };

        let Some(guard) = file.acquire()? else {
            debug!(path = %file.lock_path.display(), "state file lock still held");
            return Err(busy(&file.path));
        };
        *state = file.load()?;
        let out = f(&mut state);
        if write {
            save_kitchen_state(&file.path, &state)?;
        }
        let _ = guard.unlock();
        Ok(out)
    }
}

fn state_locked(path: &Path) -> KitchenError {
    KitchenError::StateLocked(path.display().to_string())
}

fn batch_contention(dish_id: DishId) -> impl FnOnce(&Path) -> KitchenError {
    move |path| KitchenError::Contention {
        dish_id,
        reason: format!("{} is locked by another writer", path.display()),
    }
}

impl LedgerStore for MemoryStore {
    fn apply_batch(&self, batch: &CookBatch) -> Result<CookReceipt> {
        self.with_state(true, batch_contention(batch.dish_id), |state| {
            state.apply(batch)
        })
    }

    fn inventory(&self) -> Result<Inventory> {
        self.with_state(false, state_locked, |state| state.inventory().clone())
    }

    fn cooked_stats(&self, date: NaiveDate) -> Result<CookedStats> {
        self.with_state(false, state_locked, |state| state.cooked_stats(date))
    }

    fn set_stock(&self, item: InventoryItem) -> Result<()> {
        self.with_state(true, state_locked, |state| state.set_stock(item))
    }
}
