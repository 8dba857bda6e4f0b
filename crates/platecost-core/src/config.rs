//! Configuration schema (platecost.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::diagnostic::{DiagnosticCode, Severity};

/// Costing strategy, every figure a percentage of the eventual selling price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostingSettings {
    #[serde(alias = "laborCostPercentage")]
    pub labor_cost_percentage: f64,

    #[serde(alias = "overheadCostPercentage")]
    pub overhead_cost_percentage: f64,

    #[serde(alias = "targetProfitMarginPercentage")]
    pub target_profit_margin_percentage: f64,
}

impl Default for CostingSettings {
    fn default() -> Self {
        Self {
            labor_cost_percentage: 30.0,
            overhead_cost_percentage: 20.0,
            target_profit_margin_percentage: 15.0,
        }
    }
}

impl CostingSettings {
    pub fn new(labor: f64, overhead: f64, target_profit: f64) -> Self {
        Self {
            labor_cost_percentage: labor,
            overhead_cost_percentage: overhead,
            target_profit_margin_percentage: target_profit,
        }
    }

    /// Share of the selling price left for food cost
    pub fn target_food_cost_percentage(&self) -> f64 {
        100.0
            - (self.labor_cost_percentage
                + self.overhead_cost_percentage
                + self.target_profit_margin_percentage)
    }

    /// True when labor, overhead and profit leave nothing for food cost
    pub fn is_degenerate(&self) -> bool {
        self.target_food_cost_percentage() <= 0.0
    }
}

/// Severity threshold overrides for specific diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code to severity override
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a diagnostic code, or default
    pub fn get_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Recipes excluded from catalog checks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Recipe ids (glob patterns) never checked
    #[serde(default)]
    pub skip_recipes: Vec<String>,
}

impl AllowlistRules {
    /// Check if a recipe should be skipped
    pub fn is_recipe_skipped(&self, recipe_id: &str) -> bool {
        self.skip_recipes.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, recipe_id)
            } else {
                pattern == recipe_id
            }
        })
    }
}

/// Where the catalog snapshot comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Snapshot JSON file, relative to the config file
    pub snapshot: PathBuf,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Currency label used in output
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Costing strategy for suggested prices
    #[serde(default)]
    pub costing: CostingSettings,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,

    /// Catalog snapshot location
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_currency() -> String {
    "EGP".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            costing: CostingSettings::default(),
            severity: SeverityThreshold::default(),
            allowlist: AllowlistRules::default(),
            catalog: None,
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Configured snapshot path, resolved against the project root
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.catalog.as_ref().map(|catalog| self.resolve_path(&catalog.snapshot))
    }

    /// Resolve a possibly relative path against the project root
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Simple glob matching (supports a single *)
fn glob_match(pattern: &str, text: &str) -> bool {
    if pattern == "*" || pattern == "**" {
        return true;
    }

    if let Some(star_pos) = pattern.find('*') {
        let prefix = &pattern[..star_pos];
        let suffix = &pattern[star_pos + 1..];

        text.len() >= prefix.len() + suffix.len()
            && text.starts_with(prefix)
            && text.ends_with(suffix)
    } else {
        pattern == text
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
