use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::models::{ClientRecord, Inventory, InventoryItem, MenuSet};
use crate::state::manager::{KitchenState, KitchenStateFile};

fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Atomic write: temp file next to the target, then rename over it.
fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(path: P, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;

    let mut tmp_path = OsString::from(path.as_os_str());
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load stock lines. Duplicate names: last occurrence wins.
pub fn load_inventory<P: AsRef<Path>>(path: P) -> Result<Inventory> {
    let items: Vec<InventoryItem> = load_json(path)?;
    Ok(Inventory::from_items(items))
}

/// Load menu sets. Malformed groups are dropped during deserialisation.
pub fn load_sets<P: AsRef<Path>>(path: P) -> Result<Vec<MenuSet>> {
    load_json(path)
}

pub fn save_sets<P: AsRef<Path>>(path: P, sets: &[MenuSet]) -> Result<()> {
    save_json(path, sets)
}

pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<ClientRecord>> {
    load_json(path)
}

pub fn load_kitchen_state<P: AsRef<Path>>(path: P) -> Result<KitchenState> {
    let file: KitchenStateFile = load_json(path)?;
    Ok(KitchenState::from_file(file))
}

pub fn save_kitchen_state<P: AsRef<Path>>(path: P, state: &KitchenState) -> Result<()> {
    save_json(path, &state.to_file())
}
