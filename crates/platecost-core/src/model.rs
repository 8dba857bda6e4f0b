//! Inventory, recipe and menu records
//!
//! Field names serialize in camelCase so snapshots exported by the
//! restaurant back office load without translation.

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// A stocked item with a purchase cost. Leaf of every costing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub stock: f64,

    #[serde(default)]
    pub reorder_level: f64,

    #[serde(default)]
    pub supplier: String,

    #[serde(default)]
    pub branch: String,

    /// Declared stock unit (`g`, `kg`, `ml`, `L`, `unit`)
    pub unit: String,

    /// Cost of one `unit` of this item
    pub cost_per_unit: f64,

    #[serde(default)]
    pub allergens: Vec<String>,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, unit: impl Into<String>, cost_per_unit: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category: String::new(),
            stock: 0.0,
            reorder_level: 0.0,
            supplier: String::new(),
            branch: String::new(),
            unit: unit.into(),
            cost_per_unit,
            allergens: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_allergens<I, S>(mut self, allergens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergens = allergens.into_iter().map(Into::into).collect();
        self
    }

    /// Stock unit, unrecognized spellings counted as `unit`
    pub fn stock_unit(&self) -> Unit {
        Unit::normalize(&self.unit)
    }
}

/// What an ingredient line draws from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum IngredientSource {
    /// A stocked inventory item
    Inventory(String),

    /// Another recipe, used as an intermediate preparation
    SubRecipe(String),
}

impl IngredientSource {
    /// Referenced id, whichever catalog it lives in
    pub fn id(&self) -> &str {
        match self {
            Self::Inventory(id) | Self::SubRecipe(id) => id,
        }
    }

    pub fn inventory_item_id(&self) -> Option<&str> {
        match self {
            Self::Inventory(id) => Some(id),
            Self::SubRecipe(_) => None,
        }
    }

    pub fn sub_recipe_id(&self) -> Option<&str> {
        match self {
            Self::SubRecipe(id) => Some(id),
            Self::Inventory(_) => None,
        }
    }
}

impl std::fmt::Display for IngredientSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inventory(id) => write!(f, "inventory:{}", id),
            Self::SubRecipe(id) => write!(f, "recipe:{}", id),
        }
    }
}

/// Rejected ingredient records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngredientError {
    #[error("ingredient references both inventory item '{inventory}' and sub-recipe '{sub_recipe}'")]
    BothSources { inventory: String, sub_recipe: String },

    #[error("ingredient references neither an inventory item nor a sub-recipe")]
    NoSource,
}

/// One line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "IngredientRecord", into = "IngredientRecord")]
pub struct RecipeIngredient {
    pub source: IngredientSource,

    pub quantity: f64,

    /// Declared line unit; may differ from the source's stock unit
    pub unit: String,

    /// Usable share after trim and prep loss (1-100)
    pub yield_percentage: f64,
}

impl RecipeIngredient {
    /// Line drawing from an inventory item, full yield
    pub fn inventory(id: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            source: IngredientSource::Inventory(id.into()),
            quantity,
            unit: unit.into(),
            yield_percentage: 100.0,
        }
    }

    /// Line drawing from a sub-recipe, full yield
    pub fn sub_recipe(id: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            source: IngredientSource::SubRecipe(id.into()),
            quantity,
            unit: unit.into(),
            yield_percentage: 100.0,
        }
    }

    pub fn with_yield(mut self, yield_percentage: f64) -> Self {
        self.yield_percentage = yield_percentage;
        self
    }

    pub fn line_unit(&self) -> Unit {
        Unit::normalize(&self.unit)
    }
}

/// Wire shape with the two optional reference fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngredientRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inventory_item_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_recipe_id: Option<String>,

    quantity: f64,

    unit: String,

    #[serde(default = "full_yield")]
    yield_percentage: f64,
}

fn full_yield() -> f64 {
    100.0
}

impl TryFrom<IngredientRecord> for RecipeIngredient {
    type Error = IngredientError;

    fn try_from(record: IngredientRecord) -> Result<Self, Self::Error> {
        // Empty ids count as absent
        let inventory = record.inventory_item_id.filter(|id| !id.is_empty());
        let sub_recipe = record.sub_recipe_id.filter(|id| !id.is_empty());

        let source = match (inventory, sub_recipe) {
            (Some(inventory), Some(sub_recipe)) => {
                return Err(IngredientError::BothSources { inventory, sub_recipe })
            }
            (Some(id), None) => IngredientSource::Inventory(id),
            (None, Some(id)) => IngredientSource::SubRecipe(id),
            (None, None) => return Err(IngredientError::NoSource),
        };

        Ok(Self {
            source,
            quantity: record.quantity,
            unit: record.unit,
            yield_percentage: record.yield_percentage,
        })
    }
}

impl From<RecipeIngredient> for IngredientRecord {
    fn from(ingredient: RecipeIngredient) -> Self {
        let (inventory_item_id, sub_recipe_id) = match ingredient.source {
            IngredientSource::Inventory(id) => (Some(id), None),
            IngredientSource::SubRecipe(id) => (None, Some(id)),
        };

        Self {
            inventory_item_id,
            sub_recipe_id,
            quantity: ingredient.quantity,
            unit: ingredient.unit,
            yield_percentage: ingredient.yield_percentage,
        }
    }
}

/// A recipe: an ordered list of ingredient lines producing one batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,

    /// Intermediate preparation usable as an ingredient elsewhere
    #[serde(default)]
    pub is_sub_recipe: bool,

    /// Batch-level loss applied after ingredient costs are summed (0-100)
    #[serde(default)]
    pub wastage_percentage: f64,

    #[serde(default)]
    pub instructions: String,

    /// Yield units produced per batch
    #[serde(default = "one_batch")]
    pub production_yield: f64,

    /// Label only, never used in cost math
    #[serde(default = "portion")]
    pub yield_unit: String,
}

fn one_batch() -> f64 {
    1.0
}

fn portion() -> String {
    "portion".to_string()
}

impl Recipe {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category: String::new(),
            ingredients: Vec::new(),
            is_sub_recipe: false,
            wastage_percentage: 0.0,
            instructions: String::new(),
            production_yield: one_batch(),
            yield_unit: portion(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_ingredient(mut self, ingredient: RecipeIngredient) -> Self {
        self.ingredients.push(ingredient);
        self
    }

    pub fn as_sub_recipe(mut self) -> Self {
        self.is_sub_recipe = true;
        self
    }

    pub fn with_wastage(mut self, wastage_percentage: f64) -> Self {
        self.wastage_percentage = wastage_percentage;
        self
    }

    pub fn with_production_yield(mut self, production_yield: f64, yield_unit: impl Into<String>) -> Self {
        self.production_yield = production_yield;
        self.yield_unit = yield_unit.into();
        self
    }

    /// Ids of the sub-recipes this recipe draws from, in line order
    pub fn sub_recipe_ids(&self) -> impl Iterator<Item = &str> {
        self.ingredients
            .iter()
            .filter_map(|ingredient| ingredient.source.sub_recipe_id())
    }
}

/// A sellable menu entry, optionally linked to the recipe it is made from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    pub price: f64,

    #[serde(default)]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}
