//! Cost arithmetic for single ingredient lines and batches
//!
//! Every function here is total: degenerate inputs fall back to a defined
//! number instead of dividing by zero.

use platecost_core::{InventoryItem, Unit};

/// Base cost of drawing `quantity` `unit` from an inventory item.
///
/// Returns `None` when the line unit and the stock unit belong to different
/// families (e.g. `g` against stock kept in `L`). Unrecognized spellings on
/// either side count as `unit`.
pub fn inventory_line_cost(quantity: f64, unit: &str, item: &InventoryItem) -> Option<f64> {
    let stock_unit = item.stock_unit();
    let line_unit = Unit::normalize(unit);

    if stock_unit.family() != line_unit.family() {
        return None;
    }

    let price_per_base_unit = item.cost_per_unit / stock_unit.factor();
    let total_base_units = quantity * line_unit.factor();

    Some(price_per_base_unit * total_base_units)
}

/// Inflate a base cost by trim loss: a 90% yield line costs 1/0.9 of its base.
/// A non-positive yield contributes nothing.
pub fn effective_cost(base_cost: f64, yield_percentage: f64) -> f64 {
    if yield_percentage > 0.0 {
        base_cost / (yield_percentage / 100.0)
    } else {
        0.0
    }
}

/// Apply batch-level wastage to the summed line costs
pub fn apply_wastage(total_effective_cost: f64, wastage_percentage: f64) -> f64 {
    total_effective_cost * (1.0 + wastage_percentage / 100.0)
}

/// Cost of one yield unit of a sub-recipe batch; the whole batch when the
/// production yield is not positive
pub fn per_yield_unit(batch_cost: f64, production_yield: f64) -> f64 {
    if production_yield > 0.0 {
        batch_cost / production_yield
    } else {
        batch_cost
    }
}

/// Cost of one portion; zero when the production yield is not positive
pub fn cost_per_portion(batch_cost: f64, production_yield: f64) -> f64 {
    if production_yield > 0.0 {
        batch_cost / production_yield
    } else {
        0.0
    }
}
