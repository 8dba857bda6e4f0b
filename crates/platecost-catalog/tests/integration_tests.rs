//! Integration tests for catalog snapshots, sources and the reference graph
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p platecost-catalog --test integration_tests
//! ```

mod fixtures;

use platecost_catalog::{
    CatalogSource, FixtureSource, JsonFileSource, RecipeGraph, Snapshot, SourceError,
};
use platecost_core::{IngredientSource, InventoryItem, Recipe};
use pretty_assertions::assert_eq;

// =============================================================================
// Snapshot Parsing
// =============================================================================

#[test]
fn test_bakery_snapshot_parses() {
    let snapshot = Snapshot::from_json(fixtures::bakery_snapshot()).unwrap();

    assert_eq!(snapshot.inventory.len(), 4);
    assert_eq!(snapshot.recipes.len(), 5);

    let sugar = &snapshot.inventory[2];
    assert_eq!(sugar.stock, 40.0);
    assert_eq!(sugar.reorder_level, 10.0);
    assert!(sugar.allergens.is_empty());

    let syrup = &snapshot.recipes[1];
    assert_eq!(syrup.production_yield, 1.0);
    assert_eq!(syrup.yield_unit, "portion");
    assert_eq!(syrup.wastage_percentage, 0.0);

    let rolls = &snapshot.recipes[4];
    assert_eq!(rolls.ingredients[0].source, IngredientSource::SubRecipe("rec-dough".to_string()));
    assert_eq!(rolls.ingredients[0].yield_percentage, 95.0);
}

#[test]
fn test_ambiguous_line_is_rejected() {
    let err = Snapshot::from_json(fixtures::ambiguous_line_snapshot()).unwrap_err();
    assert!(matches!(err, SourceError::ParseError(_)));
}

#[test]
fn test_inventory_items_alias() {
    let snapshot = Snapshot::from_json(
        r#"{ "inventoryItems": [ { "id": "inv-1", "unit": "g", "costPerUnit": 0.5 } ] }"#,
    )
    .unwrap();

    assert_eq!(snapshot.inventory.len(), 1);
    assert!(snapshot.recipes.is_empty());
}

// =============================================================================
// File Source
// =============================================================================

#[test]
fn test_file_source_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    let original = Snapshot::from_json(fixtures::bakery_snapshot()).unwrap();
    original.save_to_file(&path).unwrap();

    let catalogs = JsonFileSource::new(&path).load().unwrap();
    assert_eq!(catalogs, original.into_catalogs());
}

#[test]
fn test_file_source_reports_bad_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileSource::new(&path).load().unwrap_err();
    assert!(matches!(err, SourceError::ParseError(_)));
}

// =============================================================================
// Duplicate Ids
// =============================================================================

#[test]
fn test_last_duplicate_wins() {
    let source = FixtureSource::new()
        .with_inventory_item(InventoryItem::new("inv-1", "kg", 10.0))
        .with_inventory_item(InventoryItem::new("inv-2", "kg", 20.0))
        .with_inventory_item(InventoryItem::new("inv-1", "kg", 15.0));

    let catalogs = source.load().unwrap();
    assert_eq!(catalogs.inventory.get("inv-1").unwrap().cost_per_unit, 15.0);
    assert_eq!(catalogs.inventory.len(), 2);
    assert_eq!(catalogs.inventory.duplicate_ids(), vec!["inv-1".to_string()]);
}

// =============================================================================
// Reference Graph
// =============================================================================

#[test]
fn test_bakery_graph_impact() {
    let catalogs = Snapshot::from_json(fixtures::bakery_snapshot()).unwrap().into_catalogs();
    let graph = RecipeGraph::from_catalog(&catalogs.recipes);

    let mut affected = graph.downstream("rec-syrup");
    affected.sort();
    assert_eq!(affected, vec!["rec-brioche".to_string(), "rec-glaze".to_string()]);

    let mut dough_users = graph.dependents("rec-dough");
    dough_users.sort();
    assert_eq!(dough_users, vec!["rec-brioche", "rec-rolls"]);

    assert!(graph.find_cycles().is_empty());
}

#[test]
fn test_topological_order_puts_sub_recipes_first() {
    let catalogs = Snapshot::from_json(fixtures::bakery_snapshot()).unwrap().into_catalogs();
    let order = RecipeGraph::from_catalog(&catalogs.recipes).topological_sort().unwrap();

    let position = |id: &str| order.iter().position(|entry| entry == id).unwrap();
    assert!(position("rec-syrup") < position("rec-glaze"));
    assert!(position("rec-glaze") < position("rec-brioche"));
    assert!(position("rec-dough") < position("rec-rolls"));
}

#[test]
fn test_would_create_cycle_through_chain() {
    let catalogs = Snapshot::from_json(fixtures::bakery_snapshot()).unwrap().into_catalogs();
    let graph = RecipeGraph::from_catalog(&catalogs.recipes);

    // syrup using brioche would loop back through glaze
    assert!(graph.would_create_cycle("rec-syrup", "rec-brioche"));
    assert!(graph.would_create_cycle("rec-syrup", "rec-syrup"));
    assert!(!graph.would_create_cycle("rec-rolls", "rec-glaze"));
}

#[test]
fn test_sub_recipes_listed() {
    let catalogs = FixtureSource::new()
        .with_recipe(Recipe::new("a").as_sub_recipe())
        .with_recipe(Recipe::new("b"))
        .load()
        .unwrap();

    let subs: Vec<&str> = catalogs.recipes.sub_recipes().map(|r| r.id.as_str()).collect();
    assert_eq!(subs, vec!["a"]);
}
