use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::tier::ClientDistribution;

/// A roster row as exported by the client-management side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub name: String,
    /// Daily calorie target.
    pub calories: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Days of the week this client receives deliveries. Empty means every day.
    #[serde(default)]
    pub delivery_days: Vec<Weekday>,
}

fn default_active() -> bool {
    true
}

impl ClientRecord {
    pub fn delivers_on(&self, date: NaiveDate) -> bool {
        self.active && (self.delivery_days.is_empty() || self.delivery_days.contains(&date.weekday()))
    }
}

impl ClientDistribution {
    /// Active clients with a delivery on `date`, bucketed by tier.
    pub fn from_roster(clients: &[ClientRecord], date: NaiveDate) -> Self {
        Self::from_calorie_targets(
            clients
                .iter()
                .filter(|c| c.delivers_on(date))
                .map(|c| c.calories),
        )
    }
}
