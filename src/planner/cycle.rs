use chrono::{DateTime, Days, FixedOffset, NaiveDate, Offset, Utc};

use crate::planner::constants::{
    DEFAULT_UTC_OFFSET_HOURS, MENU_CYCLE_DAYS, SIXTH_MEAL_POOL_SIZE, default_cycle_epoch,
};

/// Maps calendar dates onto the 21-day menu rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleResolver {
    epoch: NaiveDate,
    offset: FixedOffset,
}

impl Default for CycleResolver {
    fn default() -> Self {
        Self::new(default_cycle_epoch(), DEFAULT_UTC_OFFSET_HOURS)
    }
}

impl CycleResolver {
    /// `epoch` is served menu day 1. `utc_offset_hours` fixes the reference
    /// timezone used to turn instants into calendar dates; out-of-range
    /// offsets fall back to UTC.
    pub fn new(epoch: NaiveDate, utc_offset_hours: i32) -> Self {
        let offset = utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { epoch, offset }
    }

    pub fn epoch(&self) -> NaiveDate {
        self.epoch
    }

    /// Menu day (1..=21) served on `date`. Dates before the epoch wrap
    /// backwards through the same rotation, so `epoch - 21 days` is day 1.
    pub fn menu_day_of(&self, date: NaiveDate) -> u8 {
        let elapsed = date.signed_duration_since(self.epoch).num_days();
        // rem_euclid keeps negative offsets in 0..21; there is no day 0.
        (elapsed.rem_euclid(MENU_CYCLE_DAYS) + 1) as u8
    }

    /// Menu day for an instant, taking the calendar date in the reference timezone.
    pub fn menu_day_of_instant(&self, instant: DateTime<Utc>) -> u8 {
        self.menu_day_of(self.local_date(instant))
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    /// `count` consecutive dates starting at `start`.
    pub fn span(&self, start: NaiveDate, count: u32) -> Vec<NaiveDate> {
        (0..u64::from(count))
            .filter_map(|i| start.checked_add_days(Days::new(i)))
            .collect()
    }
}

/// Index into the sixth-meal pool for a menu day.
///
/// The pool has 20 dishes for 21 days, so days 1 and 21 share a dish.
pub fn sixth_meal_index(menu_day: u8) -> usize {
    usize::from(menu_day).saturating_sub(1) % SIXTH_MEAL_POOL_SIZE
}
