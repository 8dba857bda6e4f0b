//! Diagnostic codes and catalog check findings
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // References
    /// Ingredient line points at an inventory item that does not exist
    RefMissingInventoryItem,

    /// Ingredient line points at a recipe that does not exist
    RefMissingSubRecipe,

    /// Ingredient line points at a recipe not flagged as a sub-recipe
    RefNotSubRecipe,

    /// Sub-recipe references form a cycle
    RefCycle,

    // Units
    /// Line unit and stock unit belong to different families
    UnitFamilyMismatch,

    /// Unit spelling outside the conversion table
    UnitUnrecognized,

    // Lines and recipes
    /// Line yield percentage outside 1-100
    LineYieldOutOfRange,

    /// Line quantity is zero or negative
    LineQuantityNonPositive,

    /// Recipe wastage percentage outside 0-100
    RecipeWastageOutOfRange,

    /// Recipe production yield is zero or negative
    RecipeYieldNonPositive,

    // Catalog and settings
    /// The same id appears more than once in a catalog
    CatalogDuplicateId,

    /// Labor, overhead and profit leave no room for food cost
    SettingsDegenerate,
}

impl DiagnosticCode {
    /// All registered codes
    pub const ALL: [DiagnosticCode; 12] = [
        Self::RefMissingInventoryItem,
        Self::RefMissingSubRecipe,
        Self::RefNotSubRecipe,
        Self::RefCycle,
        Self::UnitFamilyMismatch,
        Self::UnitUnrecognized,
        Self::LineYieldOutOfRange,
        Self::LineQuantityNonPositive,
        Self::RecipeWastageOutOfRange,
        Self::RecipeYieldNonPositive,
        Self::CatalogDuplicateId,
        Self::SettingsDegenerate,
    ];

    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RefMissingInventoryItem => "REF_MISSING_INVENTORY_ITEM",
            Self::RefMissingSubRecipe => "REF_MISSING_SUB_RECIPE",
            Self::RefNotSubRecipe => "REF_NOT_SUB_RECIPE",
            Self::RefCycle => "REF_CYCLE",
            Self::UnitFamilyMismatch => "UNIT_FAMILY_MISMATCH",
            Self::UnitUnrecognized => "UNIT_UNRECOGNIZED",
            Self::LineYieldOutOfRange => "LINE_YIELD_OUT_OF_RANGE",
            Self::LineQuantityNonPositive => "LINE_QUANTITY_NON_POSITIVE",
            Self::RecipeWastageOutOfRange => "RECIPE_WASTAGE_OUT_OF_RANGE",
            Self::RecipeYieldNonPositive => "RECIPE_YIELD_NON_POSITIVE",
            Self::CatalogDuplicateId => "CATALOG_DUPLICATE_ID",
            Self::SettingsDegenerate => "SETTINGS_DEGENERATE",
        }
    }

    /// Severity used when configuration does not override it
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::RefCycle | Self::SettingsDegenerate => Severity::Error,
            Self::RefNotSubRecipe | Self::UnitUnrecognized => Severity::Info,
            _ => Severity::Warn,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - pricing still works but a number is probably wrong
    Warn,

    /// Error - the catalog cannot be priced as configured
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Where in the catalog a finding applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Recipe (or inventory item) id
    pub recipe: String,

    /// Optional ingredient line (1-indexed)
    pub line: Option<usize>,
}

impl Location {
    /// Create a location pointing at a whole record
    pub fn new(recipe: impl Into<String>) -> Self {
        Self {
            recipe: recipe.into(),
            line: None,
        }
    }

    /// Create a location pointing at one ingredient line
    pub fn with_line(recipe: impl Into<String>, line: usize) -> Self {
        Self {
            recipe: recipe.into(),
            line: Some(line),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}#{}", self.recipe, line),
            None => write!(f, "{}", self.recipe),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Catalog location
    pub location: Option<Location>,

    /// Expected value (for comparison diagnostics)
    pub expected: Option<String>,

    /// Actual value (for comparison diagnostics)
    pub actual: Option<String>,

    /// Recipes whose cost is affected by this issue
    pub impact: Vec<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            expected: None,
            actual: None,
            impact: Vec::new(),
        }
    }

    /// Create a diagnostic at the code's default severity
    pub fn of(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, code.default_severity(), message)
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }

    /// Set downstream impact
    pub fn with_impact(mut self, impact: Vec<String>) -> Self {
        self.impact = impact;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_code_stability() {
        assert_eq!(DiagnosticCode::RefCycle.as_str(), "REF_CYCLE");
        assert_eq!(DiagnosticCode::UnitFamilyMismatch.as_str(), "UNIT_FAMILY_MISMATCH");
    }

    #[test]
    fn serde_matches_as_str() {
        for code in DiagnosticCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn default_severities() {
        assert_eq!(DiagnosticCode::RefCycle.default_severity(), Severity::Error);
        assert_eq!(DiagnosticCode::UnitFamilyMismatch.default_severity(), Severity::Warn);
        assert_eq!(DiagnosticCode::RefNotSubRecipe.default_severity(), Severity::Info);
    }

    #[test]
    fn diagnostic_serialization() {
        let diag = Diagnostic::of(
            DiagnosticCode::RefMissingInventoryItem,
            "Inventory item 'inv-404' not found",
        )
        .with_location(Location::with_line("rec-001", 2));

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("REF_MISSING_INVENTORY_ITEM"));
        assert!(json.contains("warn"));
        assert_eq!(diag.location.unwrap().to_string(), "rec-001#2");
    }
}
