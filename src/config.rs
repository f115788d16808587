use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::SetId;
use crate::planner::{CycleResolver, DEFAULT_UTC_OFFSET_HOURS, default_cycle_epoch};

/// Which ledger backend `cook` and `stock` write to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Json,
    Sqlite,
}

/// Kitchen settings. Every field has a default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenConfig {
    /// Date served as menu day 1.
    pub cycle_epoch: NaiveDate,
    /// Reference timezone for "today", as a whole-hour UTC offset.
    pub utc_offset_hours: i32,
    pub sets_path: PathBuf,
    /// JSON state file (inventory and cooked counters) for the json store.
    pub state_path: PathBuf,
    pub roster_path: PathBuf,
    /// Overrides the `isActive` flags when set.
    pub active_set_id: Option<SetId>,
    pub store: StoreKind,
    pub database_path: PathBuf,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            cycle_epoch: default_cycle_epoch(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            sets_path: PathBuf::from("menu_sets.json"),
            state_path: PathBuf::from("kitchen_state.json"),
            roster_path: PathBuf::from("clients.json"),
            active_set_id: None,
            store: StoreKind::Json,
            database_path: PathBuf::from("kitchen.db"),
        }
    }
}

impl KitchenConfig {
    /// Read the file at `path`; a missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn resolver(&self) -> CycleResolver {
        CycleResolver::new(self.cycle_epoch, self.utc_offset_hours)
    }
}
