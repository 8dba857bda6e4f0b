//! In-memory fixture source
//!
//! Returns predefined records without reading anything. Useful for:
//! - Unit testing costing logic
//! - Demos without a snapshot file
//! - Simulating an unavailable data provider
//!
//! ## Usage
//!
//! ```rust,ignore
//! use platecost_catalog::{CatalogSource, FixtureSource};
//!
//! let catalogs = FixtureSource::demo().load()?;
//! let koshari = catalogs.recipes.get("rec-001");
//!
//! // Simulate a provider outage
//! let source = FixtureSource::new().with_failure("provider offline");
//! assert!(source.load().is_err());
//! ```

use platecost_core::{InventoryItem, Recipe, RecipeIngredient};

use crate::source::{CatalogSource, SourceError};

/// In-memory catalog source
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    inventory: Vec<InventoryItem>,
    recipes: Vec<Recipe>,

    /// Error message returned by every load, when set
    failure: Option<String>,
}

impl FixtureSource {
    /// Create an empty fixture source
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory_item(mut self, item: InventoryItem) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    /// Fail every load with `message`
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    fn check_available(&self) -> Result<(), SourceError> {
        match &self.failure {
            Some(message) => Err(SourceError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }

    /// A small restaurant: ten stock items, one sauce and three dishes
    pub fn demo() -> Self {
        let inventory = vec![
            InventoryItem::new("inv-001", "kg", 15.0).with_name("Tomatoes"),
            InventoryItem::new("inv-002", "kg", 180.0).with_name("Chicken breast"),
            InventoryItem::new("inv-003", "kg", 45.0).with_name("Basmati rice"),
            InventoryItem::new("inv-004", "kg", 35.0).with_name("Lentils"),
            InventoryItem::new("inv-005", "kg", 12.0).with_name("Onions"),
            InventoryItem::new("inv-006", "L", 250.0).with_name("Olive oil"),
            InventoryItem::new("inv-007", "unit", 8.0).with_name("Cola can"),
            InventoryItem::new("inv-008", "kg", 25.0)
                .with_name("Flour")
                .with_allergens(["Gluten"]),
            InventoryItem::new("inv-009", "L", 30.0)
                .with_name("Milk")
                .with_allergens(["Dairy"]),
            InventoryItem::new("inv-010", "kg", 400.0)
                .with_name("Almonds")
                .with_allergens(["Nuts"]),
        ];

        let recipes = vec![
            Recipe::new("rec-sub-01")
                .with_name("Basic tomato sauce")
                .with_category("Sauces")
                .as_sub_recipe()
                .with_wastage(2.0)
                .with_production_yield(1.0, "kg")
                .with_ingredient(RecipeIngredient::inventory("inv-001", 1000.0, "g").with_yield(90.0))
                .with_ingredient(RecipeIngredient::inventory("inv-005", 200.0, "g").with_yield(85.0))
                .with_ingredient(RecipeIngredient::inventory("inv-006", 50.0, "ml")),
            Recipe::new("rec-001")
                .with_name("Koshari")
                .with_category("Main course")
                .with_wastage(3.0)
                .with_production_yield(10.0, "portion")
                .with_ingredient(RecipeIngredient::inventory("inv-003", 1000.0, "g"))
                .with_ingredient(RecipeIngredient::inventory("inv-004", 800.0, "g"))
                .with_ingredient(RecipeIngredient::sub_recipe("rec-sub-01", 1.0, "unit")),
            Recipe::new("rec-002")
                .with_name("Grilled chicken plate")
                .with_category("Main course")
                .with_wastage(4.0)
                .with_production_yield(4.0, "portion")
                .with_ingredient(RecipeIngredient::inventory("inv-002", 1000.0, "g"))
                .with_ingredient(RecipeIngredient::inventory("inv-003", 600.0, "g"))
                .with_ingredient(RecipeIngredient::inventory("inv-006", 80.0, "ml")),
            Recipe::new("rec-003")
                .with_name("Macaroni bechamel")
                .with_category("Main course")
                .with_wastage(5.0)
                .with_production_yield(8.0, "portion")
                .with_ingredient(RecipeIngredient::inventory("inv-008", 100.0, "g"))
                .with_ingredient(RecipeIngredient::inventory("inv-009", 1000.0, "ml")),
        ];

        Self {
            inventory,
            recipes,
            failure: None,
        }
    }
}

impl CatalogSource for FixtureSource {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn load_inventory(&self) -> Result<Vec<InventoryItem>, SourceError> {
        self.check_available()?;
        Ok(self.inventory.clone())
    }

    fn load_recipes(&self) -> Result<Vec<Recipe>, SourceError> {
        self.check_available()?;
        Ok(self.recipes.clone())
    }
}
