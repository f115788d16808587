use tracing::warn;

use crate::error::{KitchenError, Result};
use crate::models::{MenuSet, SetId};

/// The persisted menu sets, with one explicit way to pick the active one.
#[derive(Debug, Clone, Default)]
pub struct SetRegistry {
    sets: Vec<MenuSet>,
}

impl SetRegistry {
    pub fn new(sets: Vec<MenuSet>) -> Self {
        Self { sets }
    }

    pub fn get(&self, id: SetId) -> Option<&MenuSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    /// The set to plan with.
    ///
    /// A designated id must exist. Without one, the `is_active` flag decides;
    /// when several sets carry it the highest id wins.
    pub fn active(&self, designated: Option<SetId>) -> Result<Option<&MenuSet>> {
        if let Some(id) = designated {
            return self.get(id).map(Some).ok_or(KitchenError::SetNotFound(id));
        }

        let mut flagged: Vec<&MenuSet> = self.sets.iter().filter(|s| s.is_active).collect();
        flagged.sort_by_key(|s| s.id);

        let chosen = flagged.pop();
        if let Some(set) = chosen {
            if !flagged.is_empty() {
                let ignored: Vec<SetId> = flagged.iter().map(|s| s.id).collect();
                warn!(chosen = set.id, ?ignored, "several menu sets flagged active");
            }
        }
        Ok(chosen)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuSet> {
        self.sets.iter()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
