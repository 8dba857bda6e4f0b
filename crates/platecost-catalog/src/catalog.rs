//! Catalog snapshots
//!
//! A catalog is an arena of records plus an id index. Records keep their
//! insertion order so every listing is deterministic; when an id appears
//! twice the later record is the one lookups see.

use platecost_core::{InventoryItem, Recipe};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::source::SourceError;

/// A record addressable by a stable id
pub trait CatalogEntry {
    fn id(&self) -> &str;
}

impl CatalogEntry for Recipe {
    fn id(&self) -> &str {
        &self.id
    }
}

impl CatalogEntry for InventoryItem {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Id-indexed collection of records
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<T> {
    records: Vec<T>,
    index: HashMap<String, usize>,
}

pub type RecipeCatalog = Catalog<Recipe>;
pub type InventoryCatalog = Catalog<InventoryItem>;

impl<T: CatalogEntry> Catalog<T> {
    pub fn new(records: Vec<T>) -> Self {
        let mut catalog = Self {
            records,
            index: HashMap::new(),
        };
        catalog.reindex();
        catalog
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (position, record) in self.records.iter().enumerate() {
            self.index.insert(record.id().to_string(), position);
        }
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Records visible to lookups, in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(move |(position, record)| self.index.get(record.id()) == Some(position))
            .map(|(_, record)| record)
    }

    /// Every record as loaded, duplicates included
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Number of distinct ids
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Ids that appear more than once, in first-appearance order
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();

        for record in &self.records {
            let count = seen.entry(record.id()).or_insert(0);
            *count += 1;
            if *count == 2 {
                duplicates.push(record.id().to_string());
            }
        }

        duplicates
    }

    /// Add a record or replace the one with the same id, returning the replaced record
    pub fn upsert(&mut self, record: T) -> Option<T> {
        match self.index.get(record.id()) {
            Some(&position) => Some(std::mem::replace(&mut self.records[position], record)),
            None => {
                self.index.insert(record.id().to_string(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Remove the record lookups see for `id`
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let position = *self.index.get(id)?;
        let removed = self.records.remove(position);
        self.reindex();
        Some(removed)
    }
}

impl<T: CatalogEntry> Default for Catalog<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: CatalogEntry> FromIterator<T> for Catalog<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl RecipeCatalog {
    /// Recipes flagged as intermediate preparations
    pub fn sub_recipes(&self) -> impl Iterator<Item = &Recipe> + '_ {
        self.iter().filter(|recipe| recipe.is_sub_recipe)
    }
}

/// Both catalogs of one snapshot, immutable during a resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogs {
    pub recipes: RecipeCatalog,
    pub inventory: InventoryCatalog,
}

impl Catalogs {
    pub fn new(recipes: Vec<Recipe>, inventory: Vec<InventoryItem>) -> Self {
        Self {
            recipes: RecipeCatalog::new(recipes),
            inventory: InventoryCatalog::new(inventory),
        }
    }
}

/// Catalog snapshot file (subset of the back-office export we care about)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Inventory items
    #[serde(default, alias = "inventoryItems")]
    pub inventory: Vec<InventoryItem>,

    /// Recipes and sub-recipes
    #[serde(default)]
    pub recipes: Vec<Recipe>,
}

impl Snapshot {
    /// Load snapshot from file
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SourceError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_json(&contents)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json)
            .map_err(|e| SourceError::ParseError(e.to_string()))
    }

    /// Save snapshot to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), SourceError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SourceError::ParseError(e.to_string()))?;

        std::fs::write(path, json)
            .map_err(|e| SourceError::IoError(path.display().to_string(), e.to_string()))
    }

    pub fn into_catalogs(self) -> Catalogs {
        Catalogs::new(self.recipes, self.inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platecost_core::RecipeIngredient;
    use pretty_assertions::assert_eq;

    fn ids<'a>(records: impl Iterator<Item = &'a Recipe>) -> Vec<&'a str> {
        records.map(|recipe| recipe.id.as_str()).collect()
    }

    #[test]
    fn lookup_and_order() {
        let catalog = RecipeCatalog::new(vec![
            Recipe::new("rec-2"),
            Recipe::new("rec-1"),
            Recipe::new("rec-3"),
        ]);

        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("rec-1"));
        assert!(catalog.get("rec-404").is_none());
        assert_eq!(ids(catalog.iter()), vec!["rec-2", "rec-1", "rec-3"]);
    }

    #[test]
    fn later_duplicate_wins() {
        let catalog = RecipeCatalog::new(vec![
            Recipe::new("rec-1").with_name("first"),
            Recipe::new("rec-2"),
            Recipe::new("rec-1").with_name("second"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("rec-1").unwrap().name, "second");
        assert_eq!(ids(catalog.iter()), vec!["rec-2", "rec-1"]);
        assert_eq!(catalog.records().len(), 3);
        assert_eq!(catalog.duplicate_ids(), vec!["rec-1".to_string()]);
    }

    #[test]
    fn upsert_replaces_in_place() {
        let mut catalog = RecipeCatalog::new(vec![Recipe::new("rec-1"), Recipe::new("rec-2")]);

        let replaced = catalog.upsert(Recipe::new("rec-1").with_wastage(5.0));
        assert_eq!(replaced, Some(Recipe::new("rec-1")));
        assert_eq!(catalog.get("rec-1").unwrap().wastage_percentage, 5.0);

        assert!(catalog.upsert(Recipe::new("rec-3")).is_none());
        assert_eq!(ids(catalog.iter()), vec!["rec-1", "rec-2", "rec-3"]);
    }

    #[test]
    fn remove_reindexes() {
        let mut catalog = RecipeCatalog::new(vec![
            Recipe::new("rec-1"),
            Recipe::new("rec-2"),
            Recipe::new("rec-3"),
        ]);

        assert!(catalog.remove("rec-1").is_some());
        assert!(catalog.remove("rec-1").is_none());
        assert_eq!(catalog.get("rec-3").unwrap().id, "rec-3");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn parse_snapshot() {
        let json = r#"{
            "inventoryItems": [
                { "id": "inv-009", "name": "Milk", "unit": "L", "costPerUnit": 30, "allergens": ["Dairy"] }
            ],
            "recipes": [
                {
                    "id": "rec-003",
                    "name": "Macaroni bechamel",
                    "isSubRecipe": false,
                    "wastagePercentage": 5,
                    "productionYield": 8,
                    "yieldUnit": "portion",
                    "ingredients": [
                        { "inventoryItemId": "inv-009", "quantity": 1000, "unit": "ml", "yieldPercentage": 100 }
                    ]
                }
            ]
        }"#;

        let catalogs = Snapshot::from_json(json).unwrap().into_catalogs();
        let recipe = catalogs.recipes.get("rec-003").unwrap();

        assert_eq!(catalogs.inventory.get("inv-009").unwrap().allergens, vec!["Dairy".to_string()]);
        assert_eq!(recipe.ingredients, vec![RecipeIngredient::inventory("inv-009", 1000.0, "ml")]);
        assert_eq!(recipe.production_yield, 8.0);
    }

    #[test]
    fn malformed_ingredient_fails_parse() {
        let json = r#"{ "recipes": [ { "id": "rec-1", "ingredients": [ { "quantity": 1, "unit": "g" } ] } ] }"#;

        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, SourceError::ParseError(_)));
    }
}
