//! PlateCost Core
//!
//! Core domain model with stable, serializable types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod units;
pub mod model;
pub mod diagnostic;
pub mod report;
pub mod config;

pub use units::{Unit, UnitFamily};
pub use model::{InventoryItem, IngredientSource, IngredientError, RecipeIngredient, Recipe, MenuItem};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, CostingSettings, SeverityThreshold, AllowlistRules, CatalogConfig, ConfigError};
