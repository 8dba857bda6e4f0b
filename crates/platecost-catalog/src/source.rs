//! Data source trait for loading catalogs
//!
//! The costing engine never talks to a data provider directly. Anything
//! that can produce typed inventory and recipe records (a snapshot file,
//! a back-office export, a generated fixture) plugs in here.

use platecost_core::{InventoryItem, Recipe};
use std::path::{Path, PathBuf};

use crate::catalog::{Catalogs, Snapshot};

/// Errors that can occur when loading catalogs
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error reading {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Trait for data sources that can supply catalog records
pub trait CatalogSource {
    /// Get the source name (e.g., "json-file", "fixture")
    fn name(&self) -> &'static str;

    /// Load every inventory item
    fn load_inventory(&self) -> Result<Vec<InventoryItem>, SourceError>;

    /// Load every recipe and sub-recipe
    fn load_recipes(&self) -> Result<Vec<Recipe>, SourceError>;

    /// Load both catalogs as one snapshot
    fn load(&self) -> Result<Catalogs, SourceError> {
        let inventory = self.load_inventory()?;
        let recipes = self.load_recipes()?;

        tracing::debug!(
            source = self.name(),
            recipes = recipes.len(),
            inventory = inventory.len(),
            "catalogs loaded"
        );

        Ok(Catalogs::new(recipes, inventory))
    }
}

/// Reads a snapshot JSON file (`{ "inventory": [...], "recipes": [...] }`)
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn snapshot(&self) -> Result<Snapshot, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::Unavailable(format!(
                "snapshot not found at {}",
                self.path.display()
            )));
        }

        Snapshot::from_file(&self.path)
    }
}

impl CatalogSource for JsonFileSource {
    fn name(&self) -> &'static str {
        "json-file"
    }

    fn load_inventory(&self) -> Result<Vec<InventoryItem>, SourceError> {
        Ok(self.snapshot()?.inventory)
    }

    fn load_recipes(&self) -> Result<Vec<Recipe>, SourceError> {
        Ok(self.snapshot()?.recipes)
    }

    // One read for both catalogs
    fn load(&self) -> Result<Catalogs, SourceError> {
        let snapshot = self.snapshot()?;

        tracing::debug!(
            path = %self.path.display(),
            recipes = snapshot.recipes.len(),
            inventory = snapshot.inventory.len(),
            "snapshot loaded"
        );

        Ok(snapshot.into_catalogs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_unavailable() {
        let source = JsonFileSource::new("/definitely/not/here/catalog.json");
        let err = source.load().unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }

    #[test]
    fn loads_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{
                "inventory": [ { "id": "inv-1", "unit": "kg", "costPerUnit": 10 } ],
                "recipes": [ { "id": "rec-1" }, { "id": "rec-2" } ]
            }"#,
        )
        .unwrap();

        let source = JsonFileSource::new(&path);
        assert_eq!(source.name(), "json-file");
        assert_eq!(source.load_inventory().unwrap().len(), 1);

        let catalogs = source.load().unwrap();
        assert_eq!(catalogs.recipes.len(), 2);
        assert!(catalogs.inventory.contains("inv-1"));
    }
}
