//! Asset type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LookthroughError;

/// Asset class of a holding as reported in a holdings disclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    /// Common and preferred stock.
    Equity,
    /// Bonds and other fixed income securities.
    FixedIncome,
    /// Cash and short-term reserves.
    ShortTerm,
}

impl AssetType {
    /// Returns the canonical column value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Equity => "Equity",
            AssetType::FixedIncome => "FixedIncome",
            AssetType::ShortTerm => "ShortTerm",
        }
    }

    /// All asset types, in display order.
    #[must_use]
    pub fn all() -> &'static [AssetType] {
        &[AssetType::Equity, AssetType::FixedIncome, AssetType::ShortTerm]
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = LookthroughError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Equity" => Ok(AssetType::Equity),
            "FixedIncome" => Ok(AssetType::FixedIncome),
            "ShortTerm" => Ok(AssetType::ShortTerm),
            other => Err(LookthroughError::schema(vec![format!(
                "asstype {other:?} is not one of Equity, FixedIncome, ShortTerm"
            )])),
        }
    }
}
