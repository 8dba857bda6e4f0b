//! Recipe editor helpers
//!
//! Prefilled ingredient lines and the candidate list shown while searching
//! for something to add to a recipe.

use platecost_catalog::{InventoryCatalog, RecipeCatalog, RecipeGraph};
use platecost_core::{InventoryItem, Recipe, RecipeIngredient};

/// New line drawing from an inventory item.
///
/// Bulk stock units are replaced by their small counterpart (`kg` becomes
/// `g`, `L` becomes `ml`); anything else keeps the item's own unit.
pub fn default_line_for_inventory(item: &InventoryItem) -> RecipeIngredient {
    let unit = item.stock_unit().recipe_unit();
    RecipeIngredient::inventory(&item.id, 1.0, unit.as_str())
}

/// New line drawing one yield unit of a sub-recipe
pub fn default_line_for_sub_recipe(recipe: &Recipe) -> RecipeIngredient {
    RecipeIngredient::sub_recipe(&recipe.id, 1.0, &recipe.yield_unit)
}

/// Something that can be added to a recipe
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IngredientCandidate<'a> {
    Inventory(&'a InventoryItem),
    SubRecipe(&'a Recipe),
}

impl<'a> IngredientCandidate<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            Self::Inventory(item) => &item.id,
            Self::SubRecipe(recipe) => &recipe.id,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Self::Inventory(item) => &item.name,
            Self::SubRecipe(recipe) => &recipe.name,
        }
    }

    /// Prefilled line for this candidate
    pub fn default_line(&self) -> RecipeIngredient {
        match self {
            Self::Inventory(item) => default_line_for_inventory(item),
            Self::SubRecipe(recipe) => default_line_for_sub_recipe(recipe),
        }
    }
}

/// Inventory items and sub-recipes whose name contains `search`
/// (case-insensitive), inventory first.
///
/// Sources already on `existing` lines are left out. When `editing` names the
/// recipe being edited, sub-recipes that would make it reference itself,
/// directly or through other sub-recipes, are left out as well. An empty
/// search yields nothing.
pub fn candidates<'a>(
    recipes: &'a RecipeCatalog,
    inventory: &'a InventoryCatalog,
    editing: Option<&str>,
    existing: &[RecipeIngredient],
    search: &str,
) -> Vec<IngredientCandidate<'a>> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let taken = |id: &str| existing.iter().any(|line| line.source.id() == id);
    let graph = RecipeGraph::from_catalog(recipes);

    let items = inventory
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .filter(|item| !taken(&item.id))
        .map(IngredientCandidate::Inventory);

    let subs = recipes
        .sub_recipes()
        .filter(|recipe| recipe.name.to_lowercase().contains(&needle))
        .filter(|recipe| !taken(&recipe.id))
        .filter(|recipe| editing.map_or(true, |parent| !graph.would_create_cycle(parent, &recipe.id)))
        .map(IngredientCandidate::SubRecipe);

    items.chain(subs).collect()
}
