//! Test fixtures for catalog integration tests
//!
//! Snapshot documents shaped like a back-office export: camelCase fields,
//! optional descriptive fields left out, ingredient lines carrying exactly
//! one of `inventoryItemId` / `subRecipeId`.

/// A bakery snapshot
///
/// - Four inventory items, one stocked in an unrecognized unit
/// - A dough sub-recipe used by two breads
/// - A glaze sub-recipe built on another sub-recipe
pub fn bakery_snapshot() -> &'static str {
    r#"{
        "inventory": [
            { "id": "inv-flour", "name": "Flour", "unit": "kg", "costPerUnit": 25, "allergens": ["Gluten"] },
            { "id": "inv-butter", "name": "Butter", "unit": "kg", "costPerUnit": 320, "allergens": ["Dairy"] },
            { "id": "inv-sugar", "name": "Sugar", "unit": "kg", "costPerUnit": 30, "stock": 40, "reorderLevel": 10 },
            { "id": "inv-eggs", "name": "Eggs", "unit": "tray", "costPerUnit": 90 }
        ],
        "recipes": [
            {
                "id": "rec-dough",
                "name": "Sweet dough",
                "isSubRecipe": true,
                "productionYield": 2,
                "yieldUnit": "kg",
                "ingredients": [
                    { "inventoryItemId": "inv-flour", "quantity": 1000, "unit": "g" },
                    { "inventoryItemId": "inv-butter", "quantity": 200, "unit": "g" }
                ]
            },
            {
                "id": "rec-syrup",
                "name": "Syrup",
                "isSubRecipe": true,
                "ingredients": [
                    { "inventoryItemId": "inv-sugar", "quantity": 500, "unit": "g" }
                ]
            },
            {
                "id": "rec-glaze",
                "name": "Butter glaze",
                "isSubRecipe": true,
                "ingredients": [
                    { "subRecipeId": "rec-syrup", "quantity": 1, "unit": "portion" },
                    { "inventoryItemId": "inv-butter", "quantity": 50, "unit": "g" }
                ]
            },
            {
                "id": "rec-brioche",
                "name": "Brioche",
                "wastagePercentage": 5,
                "productionYield": 12,
                "ingredients": [
                    { "subRecipeId": "rec-dough", "quantity": 1, "unit": "kg" },
                    { "subRecipeId": "rec-glaze", "quantity": 1, "unit": "portion" }
                ]
            },
            {
                "id": "rec-rolls",
                "name": "Dinner rolls",
                "productionYield": 20,
                "ingredients": [
                    { "subRecipeId": "rec-dough", "quantity": 2, "unit": "kg", "yieldPercentage": 95 }
                ]
            }
        ]
    }"#
}

/// A snapshot whose ingredient line names both an inventory item and a sub-recipe
pub fn ambiguous_line_snapshot() -> &'static str {
    r#"{
        "inventory": [],
        "recipes": [
            {
                "id": "rec-1",
                "ingredients": [
                    { "inventoryItemId": "inv-1", "subRecipeId": "rec-2", "quantity": 1, "unit": "g" }
                ]
            }
        ]
    }"#
}
