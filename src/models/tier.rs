use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KitchenError, Result};
use crate::models::dish::MealType;
use crate::planner::constants::{TIER_BUCKET_LIMITS, TIER_MULTIPLIERS};

/// The five fixed calorie tiers a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CalorieTier {
    Kcal1200,
    Kcal1600,
    Kcal2000,
    Kcal2500,
    Kcal3000,
}

impl CalorieTier {
    /// All tiers, ascending.
    pub const ALL: [CalorieTier; 5] = [
        CalorieTier::Kcal1200,
        CalorieTier::Kcal1600,
        CalorieTier::Kcal2000,
        CalorieTier::Kcal2500,
        CalorieTier::Kcal3000,
    ];

    pub fn kcal(&self) -> u32 {
        match self {
            CalorieTier::Kcal1200 => 1200,
            CalorieTier::Kcal1600 => 1600,
            CalorieTier::Kcal2000 => 2000,
            CalorieTier::Kcal2500 => 2500,
            CalorieTier::Kcal3000 => 3000,
        }
    }

    /// Exact match only; anything else is not a tier.
    pub fn from_kcal(kcal: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.kcal() == kcal)
    }

    /// Bucket a client's daily calorie target into a tier.
    pub fn bucket(target_kcal: u32) -> Self {
        TIER_BUCKET_LIMITS
            .iter()
            .find(|(limit, _)| target_kcal <= *limit)
            .map(|(_, tier)| *tier)
            .unwrap_or(CalorieTier::Kcal3000)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            CalorieTier::Kcal1200 => 0,
            CalorieTier::Kcal1600 => 1,
            CalorieTier::Kcal2000 => 2,
            CalorieTier::Kcal2500 => 3,
            CalorieTier::Kcal3000 => 4,
        }
    }

    pub fn multipliers(&self) -> &'static TierMultipliers {
        &TIER_MULTIPLIERS[self.index()]
    }
}

impl TryFrom<u32> for CalorieTier {
    type Error = String;

    fn try_from(kcal: u32) -> std::result::Result<Self, Self::Error> {
        Self::from_kcal(kcal).ok_or_else(|| format!("{} is not a calorie tier", kcal))
    }
}

impl From<CalorieTier> for u32 {
    fn from(tier: CalorieTier) -> Self {
        tier.kcal()
    }
}

impl fmt::Display for CalorieTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kcal())
    }
}

impl FromStr for CalorieTier {
    type Err = KitchenError;

    fn from_str(s: &str) -> Result<Self> {
        let kcal: u32 = s
            .trim()
            .parse()
            .map_err(|_| KitchenError::InvalidInput(format!("Invalid calorie tier: {}", s)))?;
        CalorieTier::try_from(kcal).map_err(KitchenError::InvalidInput)
    }
}

/// Per-meal multipliers of one tier, relative to the 1200-kcal reference portion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierMultipliers {
    pub breakfast: f64,
    pub lunch: f64,
    pub dinner: f64,
    pub snack: f64,
    pub sixth_meal: f64,
}

impl TierMultipliers {
    /// Lookup by raw kcal value. Values that are not a tier get the 1200 row.
    pub fn for_kcal(kcal: u32) -> &'static TierMultipliers {
        CalorieTier::from_kcal(kcal)
            .unwrap_or(CalorieTier::Kcal1200)
            .multipliers()
    }

    /// Multiplier for a meal slot. Unknown slots are already at reference scale.
    pub fn for_meal(&self, meal_type: MealType) -> f64 {
        match meal_type {
            MealType::Breakfast | MealType::SecondBreakfast => self.breakfast,
            MealType::Lunch => self.lunch,
            MealType::Dinner => self.dinner,
            MealType::Snack => self.snack,
            MealType::SixthMeal => self.sixth_meal,
            MealType::Unknown => 1.0,
        }
    }
}

/// Client count per tier for one planning day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientDistribution {
    counts: BTreeMap<CalorieTier, u32>,
}

impl ClientDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, tier: CalorieTier, count: u32) -> Self {
        self.set(tier, count);
        self
    }

    pub fn set(&mut self, tier: CalorieTier, count: u32) {
        self.counts.insert(tier, count);
    }

    pub fn add(&mut self, tier: CalorieTier, count: u32) {
        *self.counts.entry(tier).or_insert(0) += count;
    }

    pub fn count(&self, tier: CalorieTier) -> u32 {
        self.counts.get(&tier).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Every tier in ascending order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (CalorieTier, u32)> + '_ {
        CalorieTier::ALL.into_iter().map(|t| (t, self.count(t)))
    }

    /// Bucket raw calorie targets (one per client).
    pub fn from_calorie_targets<I: IntoIterator<Item = u32>>(targets: I) -> Self {
        let mut dist = Self::new();
        for kcal in targets {
            dist.add(CalorieTier::bucket(kcal), 1);
        }
        dist
    }

    /// Parse `"1200=3,1600=2"`.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut dist = Self::new();
        for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (tier, count) = part.split_once('=').ok_or_else(|| {
                KitchenError::InvalidInput(format!("Expected TIER=COUNT, got '{}'", part))
            })?;
            let tier: CalorieTier = tier.parse()?;
            let count: u32 = count.trim().parse().map_err(|_| {
                KitchenError::InvalidInput(format!("Invalid client count in '{}'", part))
            })?;
            dist.add(tier, count);
        }
        Ok(dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(CalorieTier::bucket(900), CalorieTier::Kcal1200);
        assert_eq!(CalorieTier::bucket(1400), CalorieTier::Kcal1200);
        assert_eq!(CalorieTier::bucket(1401), CalorieTier::Kcal1600);
        assert_eq!(CalorieTier::bucket(1800), CalorieTier::Kcal1600);
        assert_eq!(CalorieTier::bucket(2200), CalorieTier::Kcal2000);
        assert_eq!(CalorieTier::bucket(2800), CalorieTier::Kcal2500);
        assert_eq!(CalorieTier::bucket(2801), CalorieTier::Kcal3000);
        assert_eq!(CalorieTier::bucket(5000), CalorieTier::Kcal3000);
    }

    #[test]
    fn test_unknown_kcal_uses_reference_row() {
        assert_eq!(
            TierMultipliers::for_kcal(1800),
            CalorieTier::Kcal1200.multipliers()
        );
        assert_eq!(TierMultipliers::for_kcal(1800).sixth_meal, 0.0);
    }

    #[test]
    fn test_meal_multiplier_selection() {
        let m = CalorieTier::Kcal3000.multipliers();
        assert_eq!(m.for_meal(MealType::Lunch), 3.0);
        assert_eq!(m.for_meal(MealType::SixthMeal), 1.5);
        assert_eq!(m.for_meal(MealType::SecondBreakfast), m.breakfast);
        assert_eq!(m.for_meal(MealType::Unknown), 1.0);
    }

    #[test]
    fn test_parse_distribution() {
        let dist = ClientDistribution::parse("1200=3, 1600=2,1200=1").unwrap();
        assert_eq!(dist.count(CalorieTier::Kcal1200), 4);
        assert_eq!(dist.count(CalorieTier::Kcal1600), 2);
        assert_eq!(dist.count(CalorieTier::Kcal3000), 0);
        assert_eq!(dist.total(), 6);

        assert!(ClientDistribution::parse("1700=2").is_err());
        assert!(ClientDistribution::parse("1200").is_err());
    }

    #[test]
    fn test_distribution_json_shape() {
        let dist = ClientDistribution::new()
            .with(CalorieTier::Kcal1200, 2)
            .with(CalorieTier::Kcal2500, 1);
        let json = serde_json::to_string(&dist).unwrap();
        assert_eq!(json, r#"{"1200":2,"2500":1}"#);
        let back: ClientDistribution = serde_json::from_str(&json).unwrap();
        assert_eq!(back, dist);
    }
}
