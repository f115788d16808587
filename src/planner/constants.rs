use chrono::NaiveDate;

use crate::models::{CalorieTier, TierMultipliers};

/// Length of the fixed menu rotation, in days.
pub const MENU_CYCLE_DAYS: i64 = 21;

/// Number of dishes in the sixth-meal pool. One shorter than the menu
/// cycle, so one sixth meal repeats per full rotation.
pub const SIXTH_MEAL_POOL_SIZE: usize = 20;

/// Date on which menu day 1 is served, unless configured otherwise.
pub const DEFAULT_CYCLE_EPOCH: (i32, u32, u32) = (2024, 1, 1);

/// Reference timezone offset for normalising instants to calendar dates (UTC+5).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 5;

/// Ingredient quantities are kept to one decimal place.
pub const ROUNDING_SCALE: f64 = 10.0;

/// Upper kcal bound (inclusive) for each tier bucket; above the last bound is 3000.
pub const TIER_BUCKET_LIMITS: [(u32, CalorieTier); 4] = [
    (1400, CalorieTier::Kcal1200),
    (1800, CalorieTier::Kcal1600),
    (2200, CalorieTier::Kcal2000),
    (2800, CalorieTier::Kcal2500),
];

/// Multiplier rows indexed by tier, ascending. The 1200 row is the reference
/// portion and never receives a sixth meal.
pub const TIER_MULTIPLIERS: [TierMultipliers; 5] = [
    TierMultipliers {
        breakfast: 1.0,
        lunch: 1.0,
        dinner: 1.0,
        snack: 1.0,
        sixth_meal: 0.0,
    },
    TierMultipliers {
        breakfast: 1.3,
        lunch: 1.5,
        dinner: 1.3,
        snack: 1.2,
        sixth_meal: 0.5,
    },
    TierMultipliers {
        breakfast: 1.6,
        lunch: 2.0,
        dinner: 1.6,
        snack: 1.5,
        sixth_meal: 1.0,
    },
    TierMultipliers {
        breakfast: 2.0,
        lunch: 2.5,
        dinner: 2.0,
        snack: 1.8,
        sixth_meal: 1.2,
    },
    TierMultipliers {
        breakfast: 2.4,
        lunch: 3.0,
        dinner: 2.4,
        snack: 2.0,
        sixth_meal: 1.5,
    },
];

pub fn default_cycle_epoch() -> NaiveDate {
    let (y, m, d) = DEFAULT_CYCLE_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}
