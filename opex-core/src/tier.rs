//! Frequency tiers: named subsets of event categories controlling alert verbosity.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{OpexError, OpexResult};
use crate::event::Category;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    #[default]
    Medium,
    High,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = OpexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Tier::Low),
            "medium" => Ok(Tier::Medium),
            "high" => Ok(Tier::High),
            other => Err(OpexError::InvalidRequest(format!(
                "Unknown tier '{}'. Expected low, medium or high",
                other
            ))),
        }
    }
}

/// Category lists for each tier as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierOverrides {
    #[serde(default)]
    pub low: Vec<Category>,
    #[serde(default)]
    pub medium: Vec<Category>,
    #[serde(default)]
    pub high: Vec<Category>,
}

/// Mapping from tier to the categories it includes.
///
/// Every tier is a superset of the tier below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierDefinitions {
    tiers: BTreeMap<Tier, BTreeSet<Category>>,
    custom: bool,
}

impl Default for TierDefinitions {
    fn default() -> Self {
        let low: BTreeSet<Category> = [Category::Standard, Category::QuarterEnd].into();

        let mut medium = low.clone();
        medium.extend([Category::Vix, Category::LeapsAddition, Category::Holiday]);

        let mut high = medium.clone();
        high.insert(Category::AmSettledLtd);

        TierDefinitions {
            tiers: BTreeMap::from([(Tier::Low, low), (Tier::Medium, medium), (Tier::High, high)]),
            custom: false,
        }
    }
}

impl TierDefinitions {
    /// Build user-defined tiers, rejecting definitions that break nesting.
    pub fn custom(overrides: &TierOverrides) -> OpexResult<Self> {
        let low: BTreeSet<Category> = overrides.low.iter().copied().collect();
        let medium: BTreeSet<Category> = overrides.medium.iter().copied().collect();
        let high: BTreeSet<Category> = overrides.high.iter().copied().collect();

        check_nested(Tier::Low, &low, Tier::Medium, &medium)?;
        check_nested(Tier::Medium, &medium, Tier::High, &high)?;

        if high.is_empty() {
            return Err(OpexError::MalformedCalendar(
                "Tier definitions include no categories".into(),
            ));
        }

        Ok(TierDefinitions {
            tiers: BTreeMap::from([(Tier::Low, low), (Tier::Medium, medium), (Tier::High, high)]),
            custom: true,
        })
    }

    /// Resolve optional overrides, falling back to the built-in tiers.
    pub fn from_overrides(overrides: Option<&TierOverrides>) -> OpexResult<Self> {
        match overrides {
            Some(o) => Self::custom(o),
            None => Ok(Self::default()),
        }
    }

    pub fn categories(&self, tier: Tier) -> &BTreeSet<Category> {
        // All three tiers are inserted by every constructor
        &self.tiers[&tier]
    }

    pub fn includes(&self, tier: Tier, category: Category) -> bool {
        self.categories(tier).contains(&category)
    }

    /// Whether these definitions came from configuration rather than the defaults.
    pub fn is_custom(&self) -> bool {
        self.custom
    }

    /// Every category referenced by any tier.
    pub fn referenced(&self) -> BTreeSet<Category> {
        self.tiers.values().flatten().copied().collect()
    }

    /// Smallest tier that includes `category`, if any.
    pub fn lowest_tier_for(&self, category: Category) -> Option<Tier> {
        Tier::ALL.into_iter().find(|t| self.includes(*t, category))
    }
}

fn check_nested(
    lower: Tier,
    lower_set: &BTreeSet<Category>,
    upper: Tier,
    upper_set: &BTreeSet<Category>,
) -> OpexResult<()> {
    if let Some(missing) = lower_set.difference(upper_set).next() {
        return Err(OpexError::MalformedCalendar(format!(
            "Tier '{}' includes '{}' but tier '{}' does not",
            lower, missing, upper
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tiers_are_nested() {
        let tiers = TierDefinitions::default();
        assert!(tiers.categories(Tier::Low).is_subset(tiers.categories(Tier::Medium)));
        assert!(tiers.categories(Tier::Medium).is_subset(tiers.categories(Tier::High)));
        assert_eq!(tiers.categories(Tier::High).len(), Category::ALL.len());
    }

    #[test]
    fn default_tier_membership() {
        let tiers = TierDefinitions::default();
        assert_eq!(tiers.lowest_tier_for(Category::Standard), Some(Tier::Low));
        assert_eq!(tiers.lowest_tier_for(Category::QuarterEnd), Some(Tier::Low));
        assert_eq!(tiers.lowest_tier_for(Category::Vix), Some(Tier::Medium));
        assert_eq!(tiers.lowest_tier_for(Category::Holiday), Some(Tier::Medium));
        assert_eq!(tiers.lowest_tier_for(Category::LeapsAddition), Some(Tier::Medium));
        assert_eq!(tiers.lowest_tier_for(Category::AmSettledLtd), Some(Tier::High));
        assert!(!tiers.is_custom());
    }

    #[test]
    fn unknown_tier_is_invalid_request() {
        assert_eq!("HIGH".parse::<Tier>().unwrap(), Tier::High);
        let err = "verbose".parse::<Tier>().unwrap_err();
        assert!(err.is_invalid_request());
    }

    #[test]
    fn custom_tiers_must_nest() {
        let overrides = TierOverrides {
            low: vec![Category::Vix],
            medium: vec![Category::Standard],
            high: vec![Category::Standard, Category::Vix],
        };
        let err = TierDefinitions::custom(&overrides).unwrap_err();
        assert!(err.is_malformed_calendar());
        assert!(err.to_string().contains("vix"));
    }

    #[test]
    fn custom_tiers_deduplicate_categories() {
        let overrides = TierOverrides {
            low: vec![Category::Standard, Category::Standard],
            medium: vec![Category::Standard, Category::Holiday],
            high: vec![Category::Standard, Category::Holiday, Category::Vix],
        };
        let tiers = TierDefinitions::custom(&overrides).unwrap();
        assert!(tiers.is_custom());
        assert_eq!(tiers.categories(Tier::Low).len(), 1);
        assert_eq!(tiers.referenced().len(), 3);
    }
}
