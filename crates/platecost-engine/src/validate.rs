//! Catalog checks
//!
//! Costing never fails on bad data: unknown references and unit mismatches
//! silently cost zero. This module reports those places (and a few more)
//! as diagnostics so they can be fixed at the source.
//!
//! Every check runs; nothing stops at the first finding.

use platecost_catalog::{InventoryCatalog, RecipeCatalog, RecipeGraph};
use platecost_core::{
    Config, Diagnostic, DiagnosticCode, IngredientSource, Location, Recipe, RecipeIngredient, Unit,
};
use tracing::debug;

/// Check both catalogs and the costing strategy
pub fn validate(recipes: &RecipeCatalog, inventory: &InventoryCatalog, config: &Config) -> Vec<Diagnostic> {
    let graph = RecipeGraph::from_catalog(recipes);
    let mut diagnostics = Vec::new();

    if config.costing.is_degenerate() {
        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::SettingsDegenerate,
                format!(
                    "Labor ({}%), overhead ({}%) and profit ({}%) leave no share of the price for food cost",
                    config.costing.labor_cost_percentage,
                    config.costing.overhead_cost_percentage,
                    config.costing.target_profit_margin_percentage,
                ),
            )
            .with_comparison("> 0%", format!("{}%", config.costing.target_food_cost_percentage())),
        );
    }

    for id in recipes.duplicate_ids() {
        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::CatalogDuplicateId,
                format!("Recipe id '{}' appears more than once; the last record is used", id),
            )
            .with_location(Location::new(id)),
        );
    }

    for id in inventory.duplicate_ids() {
        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::CatalogDuplicateId,
                format!("Inventory item id '{}' appears more than once; the last record is used", id),
            )
            .with_location(Location::new(id)),
        );
    }

    for item in inventory.iter() {
        if Unit::parse(&item.unit).is_none() {
            diagnostics.push(
                Diagnostic::of(
                    DiagnosticCode::UnitUnrecognized,
                    format!(
                        "Inventory item '{}' is stocked in unrecognized unit '{}' and is costed per unit",
                        item.id, item.unit
                    ),
                )
                .with_location(Location::new(&item.id)),
            );
        }
    }

    for recipe in recipes.iter() {
        if config.allowlist.is_recipe_skipped(&recipe.id) {
            debug!(recipe = %recipe.id, "skipped by allowlist");
            continue;
        }

        check_recipe(recipe, recipes, inventory, &graph, &mut diagnostics);
    }

    for cycle in graph.find_cycles() {
        let Some(first) = cycle.first() else { continue };
        if config.allowlist.is_recipe_skipped(first) {
            continue;
        }

        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::RefCycle,
                format!("Sub-recipe cycle: {}", cycle.join(" -> ")),
            )
            .with_location(Location::new(first))
            .with_impact(graph.downstream(first)),
        );
    }

    for diagnostic in &mut diagnostics {
        diagnostic.severity = config
            .severity
            .get_severity(diagnostic.code, diagnostic.code.default_severity());
    }

    debug!(
        recipes = recipes.len(),
        inventory = inventory.len(),
        diagnostics = diagnostics.len(),
        "catalog checked"
    );

    diagnostics
}

fn check_recipe(
    recipe: &Recipe,
    recipes: &RecipeCatalog,
    inventory: &InventoryCatalog,
    graph: &RecipeGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if recipe.production_yield <= 0.0 {
        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::RecipeYieldNonPositive,
                format!(
                    "Recipe '{}' has production yield {}; its cost per portion is 0",
                    recipe.id, recipe.production_yield
                ),
            )
            .with_location(Location::new(&recipe.id))
            .with_comparison("> 0", recipe.production_yield.to_string()),
        );
    }

    if !(0.0..=100.0).contains(&recipe.wastage_percentage) {
        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::RecipeWastageOutOfRange,
                format!(
                    "Recipe '{}' has wastage {}%",
                    recipe.id, recipe.wastage_percentage
                ),
            )
            .with_location(Location::new(&recipe.id))
            .with_comparison("0-100", recipe.wastage_percentage.to_string()),
        );
    }

    for (index, line) in recipe.ingredients.iter().enumerate() {
        let location = Location::with_line(&recipe.id, index + 1);
        check_line(recipe, line, location, recipes, inventory, graph, diagnostics);
    }
}

fn check_line(
    recipe: &Recipe,
    line: &RecipeIngredient,
    location: Location,
    recipes: &RecipeCatalog,
    inventory: &InventoryCatalog,
    graph: &RecipeGraph,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if line.quantity <= 0.0 {
        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::LineQuantityNonPositive,
                format!("Line {} uses quantity {} of '{}'", location, line.quantity, line.source),
            )
            .with_location(location.clone()),
        );
    }

    if !(1.0..=100.0).contains(&line.yield_percentage) {
        diagnostics.push(
            Diagnostic::of(
                DiagnosticCode::LineYieldOutOfRange,
                format!("Line {} has yield {}%", location, line.yield_percentage),
            )
            .with_location(location.clone())
            .with_comparison("1-100", line.yield_percentage.to_string()),
        );
    }

    let impact = || {
        let mut affected = vec![recipe.id.clone()];
        affected.extend(graph.downstream(&recipe.id));
        affected
    };

    match &line.source {
        IngredientSource::Inventory(item_id) => {
            if Unit::parse(&line.unit).is_none() {
                diagnostics.push(
                    Diagnostic::of(
                        DiagnosticCode::UnitUnrecognized,
                        format!("Line {} uses unrecognized unit '{}', costed per unit", location, line.unit),
                    )
                    .with_location(location.clone()),
                );
            }

            match inventory.get(item_id) {
                None => diagnostics.push(
                    Diagnostic::of(
                        DiagnosticCode::RefMissingInventoryItem,
                        format!("Line {} references unknown inventory item '{}'", location, item_id),
                    )
                    .with_location(location)
                    .with_impact(impact()),
                ),
                Some(item) => {
                    let stock = item.stock_unit().family();
                    let used = line.line_unit().family();
                    if stock != used {
                        diagnostics.push(
                            Diagnostic::of(
                                DiagnosticCode::UnitFamilyMismatch,
                                format!(
                                    "Line {} measures '{}' in {} but it is stocked in {}; the line costs 0",
                                    location, item_id, line.unit, item.unit
                                ),
                            )
                            .with_location(location)
                            .with_comparison(stock.to_string(), used.to_string())
                            .with_impact(impact()),
                        );
                    }
                }
            }
        }
        IngredientSource::SubRecipe(sub_id) => match recipes.get(sub_id) {
            None => diagnostics.push(
                Diagnostic::of(
                    DiagnosticCode::RefMissingSubRecipe,
                    format!("Line {} references unknown recipe '{}'", location, sub_id),
                )
                .with_location(location)
                .with_impact(impact()),
            ),
            Some(sub) if !sub.is_sub_recipe => diagnostics.push(
                Diagnostic::of(
                    DiagnosticCode::RefNotSubRecipe,
                    format!("Line {} uses recipe '{}', which is not marked as a sub-recipe", location, sub_id),
                )
                .with_location(location),
            ),
            Some(_) => {}
        },
    }
}
