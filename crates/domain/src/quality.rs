//! Quality tier value object.
//!
//! The ordinal scale shared by every object-enrichment facet: provenance,
//! combat stats, and market value all multiply off the same tier, which is
//! what keeps the three facets coherent despite having no dependency edges
//! between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Ordinal craftsmanship rank of a game object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Poor,
    #[default]
    Common,
    Fine,
    Superior,
    Masterwork,
    Legendary,
}

impl QualityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Poor => "poor",
            Self::Common => "common",
            Self::Fine => "fine",
            Self::Superior => "superior",
            Self::Masterwork => "masterwork",
            Self::Legendary => "legendary",
        }
    }

    /// Multiplicative bonus applied to physical, economic, and narrative
    /// attributes of an object at this tier.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Poor => 0.5,
            Self::Common => 1.0,
            Self::Fine => 1.5,
            Self::Superior => 2.5,
            Self::Masterwork => 4.0,
            Self::Legendary => 8.0,
        }
    }

    pub fn all() -> [QualityTier; 6] {
        [
            Self::Poor,
            Self::Common,
            Self::Fine,
            Self::Superior,
            Self::Masterwork,
            Self::Legendary,
        ]
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "poor" => Ok(Self::Poor),
            "common" => Ok(Self::Common),
            "fine" => Ok(Self::Fine),
            "superior" => Ok(Self::Superior),
            "masterwork" => Ok(Self::Masterwork),
            "legendary" => Ok(Self::Legendary),
            _ => Err(DomainError::parse(format!("unknown quality tier '{s}'"))),
        }
    }
}
