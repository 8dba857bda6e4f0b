//! PlateCost engine - recipe costing logic
//!
//! This crate implements:
//! - Unit-conversion costing of ingredient lines
//! - Recursive cost and allergen resolution through sub-recipes
//! - Suggested selling prices from a costing strategy
//! - Catalog checks that report problems instead of failing

pub mod costing;
pub mod resolver;
pub mod pricing;
pub mod validate;
pub mod editor;

pub use costing::{inventory_line_cost, effective_cost, apply_wastage, per_yield_unit, cost_per_portion};
pub use resolver::{CostResolver, CostSheet, LineCost, LineStatus, RecipeCosting, ResolveError, ResolverStats, preview_draft, resolve_costs};
pub use pricing::{suggest_price, MenuItemDraft, PricingBreakdown};
pub use validate::validate;
pub use editor::{IngredientCandidate, candidates, default_line_for_inventory, default_line_for_sub_recipe};
