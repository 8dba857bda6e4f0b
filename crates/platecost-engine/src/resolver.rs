//! Recursive cost and allergen resolution
//!
//! A [`CostResolver`] is one resolution pass over an immutable pair of
//! catalogs. Each recipe's batch cost and allergen set is computed at most
//! once per pass and memoized by recipe id, so shared sub-recipes are priced
//! once no matter how many recipes use them. Construct a new resolver
//! whenever either catalog changes; nothing carries over between passes.
//!
//! Recipes currently being resolved sit on a stack. Reaching one of them
//! again means the sub-recipe graph has a cycle, which aborts the pass with
//! [`ResolveError::CyclicReference`].

use platecost_catalog::{InventoryCatalog, RecipeCatalog};
use platecost_core::{IngredientSource, Recipe};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, warn};

use crate::costing;

/// Resolution failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// `chain` runs from the repeated recipe back to itself
    #[error("cyclic sub-recipe reference: {}", chain.join(" -> "))]
    CyclicReference { chain: Vec<String> },
}

/// How an ingredient line was priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Costed,

    /// Line and stock units are in different families; costs zero
    UnitMismatch,

    /// Referenced inventory item does not exist; costs zero
    MissingInventoryItem,

    /// Referenced sub-recipe does not exist; costs zero
    MissingSubRecipe,
}

/// Priced ingredient line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineCost {
    pub source: IngredientSource,
    pub quantity: f64,
    pub unit: String,
    pub yield_percentage: f64,

    /// Cost before yield loss
    pub base_cost: f64,

    /// Cost after yield loss
    pub effective_cost: f64,

    pub status: LineStatus,
}

/// Derived figures for one recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeCosting {
    pub recipe_id: String,
    pub name: String,
    pub is_sub_recipe: bool,

    /// Cost of one full batch, wastage included
    pub total_batch_cost: f64,

    /// Batch cost divided by production yield (0 when the yield is not positive)
    pub cost_per_portion: f64,

    pub yield_unit: String,

    /// Allergens inherited through every line, sorted and deduplicated
    pub allergens: Vec<String>,
}

/// Memo cache counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub cost_hits: usize,
    pub cost_misses: usize,
    pub allergen_hits: usize,
    pub allergen_misses: usize,
}

/// One resolution pass over a recipe and an inventory catalog
pub struct CostResolver<'a> {
    recipes: &'a RecipeCatalog,
    inventory: &'a InventoryCatalog,
    costs: HashMap<String, f64>,
    allergens: HashMap<String, BTreeSet<String>>,
    resolving: Vec<String>,
    stats: ResolverStats,
}

impl<'a> CostResolver<'a> {
    pub fn new(recipes: &'a RecipeCatalog, inventory: &'a InventoryCatalog) -> Self {
        Self {
            recipes,
            inventory,
            costs: HashMap::new(),
            allergens: HashMap::new(),
            resolving: Vec::new(),
            stats: ResolverStats::default(),
        }
    }

    pub fn stats(&self) -> ResolverStats {
        self.stats
    }

    fn enter(&mut self, recipe_id: &str) -> Result<(), ResolveError> {
        if let Some(start) = self.resolving.iter().position(|id| id == recipe_id) {
            let mut chain = self.resolving[start..].to_vec();
            chain.push(recipe_id.to_string());
            return Err(ResolveError::CyclicReference { chain });
        }

        self.resolving.push(recipe_id.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.resolving.pop();
    }

    /// Total batch cost of a recipe; 0 for an unknown id
    pub fn resolve_cost(&mut self, recipe_id: &str) -> Result<f64, ResolveError> {
        if let Some(&cost) = self.costs.get(recipe_id) {
            self.stats.cost_hits += 1;
            return Ok(cost);
        }

        self.enter(recipe_id)?;
        let recipes = self.recipes;
        let priced = match recipes.get(recipe_id) {
            Some(recipe) => self.price_lines(recipe).map(|lines| Some(batch_cost(recipe, &lines))),
            None => Ok(None),
        };
        self.leave();

        match priced? {
            Some(cost) => {
                self.stats.cost_misses += 1;
                self.costs.insert(recipe_id.to_string(), cost);
                Ok(cost)
            }
            None => {
                debug!(recipe = recipe_id, "unknown recipe costs nothing");
                Ok(0.0)
            }
        }
    }

    /// Allergens of a recipe and everything it draws from; empty for an unknown id
    pub fn resolve_allergens(&mut self, recipe_id: &str) -> Result<BTreeSet<String>, ResolveError> {
        if let Some(allergens) = self.allergens.get(recipe_id) {
            self.stats.allergen_hits += 1;
            return Ok(allergens.clone());
        }

        self.enter(recipe_id)?;
        let recipes = self.recipes;
        let collected = match recipes.get(recipe_id) {
            Some(recipe) => self.collect_allergens(recipe).map(Some),
            None => Ok(None),
        };
        self.leave();

        match collected? {
            Some(allergens) => {
                self.stats.allergen_misses += 1;
                self.allergens.insert(recipe_id.to_string(), allergens.clone());
                Ok(allergens)
            }
            None => Ok(BTreeSet::new()),
        }
    }

    /// Batch cost divided by production yield; 0 for unknown recipes or non-positive yields
    pub fn cost_per_portion(&mut self, recipe_id: &str) -> Result<f64, ResolveError> {
        let recipes = self.recipes;
        match recipes.get(recipe_id) {
            Some(recipe) => {
                let cost = self.resolve_cost(recipe_id)?;
                Ok(costing::cost_per_portion(cost, recipe.production_yield))
            }
            None => Ok(0.0),
        }
    }

    /// Every derived figure for one catalog recipe
    pub fn costing(&mut self, recipe_id: &str) -> Result<RecipeCosting, ResolveError> {
        let total_batch_cost = self.resolve_cost(recipe_id)?;
        let allergens = self.resolve_allergens(recipe_id)?;

        let recipes = self.recipes;
        let recipe = recipes.get(recipe_id);

        Ok(RecipeCosting {
            recipe_id: recipe_id.to_string(),
            name: recipe.map(|r| r.name.clone()).unwrap_or_default(),
            is_sub_recipe: recipe.map_or(false, |r| r.is_sub_recipe),
            total_batch_cost,
            cost_per_portion: recipe
                .map_or(0.0, |r| costing::cost_per_portion(total_batch_cost, r.production_yield)),
            yield_unit: recipe.map(|r| r.yield_unit.clone()).unwrap_or_default(),
            allergens: allergens.into_iter().collect(),
        })
    }

    /// Line-by-line pricing of a recipe, zero-cost fallbacks marked
    pub fn line_costs(&mut self, recipe: &Recipe) -> Result<Vec<LineCost>, ResolveError> {
        self.enter(&recipe.id)?;
        let lines = self.price_lines(recipe);
        self.leave();
        lines
    }

    /// Price a draft recipe, as the editor does while a recipe is being changed.
    ///
    /// Wastage and production yield come from the draft itself. Its id is
    /// treated as in progress from the start, so a draft that would close a
    /// loop through the catalog fails with [`ResolveError::CyclicReference`].
    /// Use a fresh resolver when the draft replaces a catalog recipe, since
    /// a cached catalog version would hide the loop.
    pub fn preview(&mut self, draft: &Recipe) -> Result<(RecipeCosting, Vec<LineCost>), ResolveError> {
        self.enter(&draft.id)?;
        let priced = self
            .price_lines(draft)
            .and_then(|lines| self.collect_allergens(draft).map(|allergens| (lines, allergens)));
        self.leave();
        let (lines, allergens) = priced?;

        let total_batch_cost = batch_cost(draft, &lines);
        let costing = RecipeCosting {
            recipe_id: draft.id.clone(),
            name: draft.name.clone(),
            is_sub_recipe: draft.is_sub_recipe,
            total_batch_cost,
            cost_per_portion: costing::cost_per_portion(total_batch_cost, draft.production_yield),
            yield_unit: draft.yield_unit.clone(),
            allergens: allergens.into_iter().collect(),
        };

        Ok((costing, lines))
    }

    fn price_lines(&mut self, recipe: &Recipe) -> Result<Vec<LineCost>, ResolveError> {
        let mut lines = Vec::with_capacity(recipe.ingredients.len());

        for ingredient in &recipe.ingredients {
            let (base_cost, status) = match &ingredient.source {
                IngredientSource::Inventory(item_id) => match self.inventory.get(item_id) {
                    Some(item) => {
                        match costing::inventory_line_cost(ingredient.quantity, &ingredient.unit, item) {
                            Some(cost) => (cost, LineStatus::Costed),
                            None => {
                                warn!(
                                    recipe = %recipe.id,
                                    item = %item_id,
                                    line_unit = %ingredient.unit,
                                    stock_unit = %item.unit,
                                    "unit family mismatch, line costs nothing"
                                );
                                (0.0, LineStatus::UnitMismatch)
                            }
                        }
                    }
                    None => {
                        debug!(recipe = %recipe.id, item = %item_id, "unknown inventory item");
                        (0.0, LineStatus::MissingInventoryItem)
                    }
                },
                IngredientSource::SubRecipe(sub_id) => {
                    let batch = self.resolve_cost(sub_id)?;
                    let recipes = self.recipes;
                    match recipes.get(sub_id) {
                        Some(sub) => (
                            costing::per_yield_unit(batch, sub.production_yield) * ingredient.quantity,
                            LineStatus::Costed,
                        ),
                        None => (0.0, LineStatus::MissingSubRecipe),
                    }
                }
            };

            lines.push(LineCost {
                source: ingredient.source.clone(),
                quantity: ingredient.quantity,
                unit: ingredient.unit.clone(),
                yield_percentage: ingredient.yield_percentage,
                base_cost,
                effective_cost: costing::effective_cost(base_cost, ingredient.yield_percentage),
                status,
            });
        }

        Ok(lines)
    }

    fn collect_allergens(&mut self, recipe: &Recipe) -> Result<BTreeSet<String>, ResolveError> {
        let mut allergens = BTreeSet::new();

        for ingredient in &recipe.ingredients {
            match &ingredient.source {
                IngredientSource::Inventory(item_id) => {
                    if let Some(item) = self.inventory.get(item_id) {
                        allergens.extend(item.allergens.iter().cloned());
                    }
                }
                IngredientSource::SubRecipe(sub_id) => {
                    allergens.extend(self.resolve_allergens(sub_id)?);
                }
            }
        }

        Ok(allergens)
    }
}

fn batch_cost(recipe: &Recipe, lines: &[LineCost]) -> f64 {
    let total_effective_cost: f64 = lines.iter().map(|line| line.effective_cost).sum();
    costing::apply_wastage(total_effective_cost, recipe.wastage_percentage)
}

/// Price a recipe that is not (or not yet) the catalog's version in a
/// pass of its own. See [`CostResolver::preview`].
pub fn preview_draft(
    draft: &Recipe,
    recipes: &RecipeCatalog,
    inventory: &InventoryCatalog,
) -> Result<(RecipeCosting, Vec<LineCost>), ResolveError> {
    CostResolver::new(recipes, inventory).preview(draft)
}

/// Run one pass over every recipe in the catalog
pub fn resolve_costs(
    recipes: &RecipeCatalog,
    inventory: &InventoryCatalog,
) -> Result<BTreeMap<String, RecipeCosting>, ResolveError> {
    let mut resolver = CostResolver::new(recipes, inventory);
    let mut result = BTreeMap::new();

    for recipe in recipes.iter() {
        result.insert(recipe.id.clone(), resolver.costing(&recipe.id)?);
    }

    let stats = resolver.stats();
    info!(
        recipes = result.len(),
        cost_misses = stats.cost_misses,
        cost_hits = stats.cost_hits,
        "resolution pass complete"
    );

    Ok(result)
}

/// Cost sheet of a whole catalog, in catalog order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostSheet {
    /// Timestamp (RFC 3339)
    pub generated_at: String,
    pub currency: String,
    pub recipes: Vec<RecipeCosting>,
}

impl CostSheet {
    pub fn build(
        recipes: &RecipeCatalog,
        inventory: &InventoryCatalog,
        currency: impl Into<String>,
    ) -> Result<Self, ResolveError> {
        let mut resolver = CostResolver::new(recipes, inventory);
        let rows = recipes
            .iter()
            .map(|recipe| resolver.costing(&recipe.id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            currency: currency.into(),
            recipes: rows,
        })
    }

    pub fn get(&self, recipe_id: &str) -> Option<&RecipeCosting> {
        self.recipes.iter().find(|row| row.recipe_id == recipe_id)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
