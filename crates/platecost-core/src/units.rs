//! Measurement units and conversion factors
//!
//! Units are grouped in families. Quantities only convert within a family,
//! each unit carrying a factor relative to the family's base unit
//! (gram, millilitre, single unit).

use serde::{Deserialize, Serialize};

/// Unit family (what a quantity measures)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitFamily {
    /// g, kg
    Weight,

    /// ml, L
    Volume,

    /// unit
    Count,
}

impl std::fmt::Display for UnitFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Weight => write!(f, "weight"),
            Self::Volume => write!(f, "volume"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// A recognized measurement unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "g")]
    Gram,

    #[serde(rename = "kg")]
    Kilogram,

    #[serde(rename = "ml")]
    Millilitre,

    #[serde(rename = "L")]
    Litre,

    #[serde(rename = "unit")]
    Count,
}

impl Unit {
    /// All recognized units
    pub const ALL: [Unit; 5] = [
        Unit::Gram,
        Unit::Kilogram,
        Unit::Millilitre,
        Unit::Litre,
        Unit::Count,
    ];

    /// Parse an exact unit spelling. Spellings are case-sensitive (`L`, not `l`).
    pub fn parse(spelling: &str) -> Option<Unit> {
        Self::ALL.into_iter().find(|unit| unit.as_str() == spelling)
    }

    /// Resolve a declared spelling, treating anything unrecognized as a count.
    pub fn normalize(spelling: &str) -> Unit {
        Self::parse(spelling).unwrap_or(Unit::Count)
    }

    /// Stable spelling used in catalogs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Millilitre => "ml",
            Self::Litre => "L",
            Self::Count => "unit",
        }
    }

    /// Multiplier to the family's base unit
    pub fn factor(&self) -> f64 {
        match self {
            Self::Gram | Self::Millilitre | Self::Count => 1.0,
            Self::Kilogram | Self::Litre => 1000.0,
        }
    }

    pub fn family(&self) -> UnitFamily {
        match self {
            Self::Gram | Self::Kilogram => UnitFamily::Weight,
            Self::Millilitre | Self::Litre => UnitFamily::Volume,
            Self::Count => UnitFamily::Count,
        }
    }

    /// Unit an ingredient line defaults to when drawing from stock kept in `self`
    pub fn recipe_unit(&self) -> Unit {
        match self {
            Self::Kilogram => Self::Gram,
            Self::Litre => Self::Millilitre,
            other => *other,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_exact_spellings() {
        assert_eq!(Unit::parse("kg"), Some(Unit::Kilogram));
        assert_eq!(Unit::parse("L"), Some(Unit::Litre));
        assert_eq!(Unit::parse("l"), None);
        assert_eq!(Unit::parse("cup"), None);
    }

    #[test]
    fn unrecognized_spelling_is_count() {
        assert_eq!(Unit::normalize("portion"), Unit::Count);
        assert_eq!(Unit::normalize("portion").family(), UnitFamily::Count);
        assert_eq!(Unit::normalize("portion").factor(), 1.0);
    }

    #[test]
    fn factors_and_families() {
        assert_eq!(Unit::Kilogram.factor(), 1000.0);
        assert_eq!(Unit::Litre.factor(), 1000.0);
        assert_eq!(Unit::Gram.family(), Unit::Kilogram.family());
        assert_ne!(Unit::Litre.family(), Unit::Gram.family());
    }

    #[test]
    fn serde_uses_catalog_spelling() {
        let json = serde_json::to_string(&Unit::Litre).unwrap();
        assert_eq!(json, "\"L\"");
        let unit: Unit = serde_json::from_str("\"ml\"").unwrap();
        assert_eq!(unit, Unit::Millilitre);
    }
}
