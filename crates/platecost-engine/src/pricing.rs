//! Suggested selling prices
//!
//! The costing strategy splits the selling price into labor, overhead,
//! profit and whatever is left for food. Dividing a portion's food cost by
//! that remaining share gives the price that keeps the split intact.

use chrono::{DateTime, Utc};
use platecost_core::{CostingSettings, MenuItem, Recipe};
use serde::Serialize;
use tracing::warn;

/// Suggested selling price for one portion.
///
/// Returns 0 when the strategy leaves no share for food cost.
pub fn suggest_price(cost_per_portion: f64, settings: &CostingSettings) -> f64 {
    let target = settings.target_food_cost_percentage();
    if target <= 0.0 {
        warn!(target_food_cost = target, "costing strategy leaves nothing for food cost");
        return 0.0;
    }

    cost_per_portion / (target / 100.0)
}

/// Every figure shown next to a suggested price
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingBreakdown {
    pub cost_per_portion: f64,
    pub labor_cost_percentage: f64,
    pub overhead_cost_percentage: f64,
    pub target_profit_margin_percentage: f64,
    pub target_food_cost_percentage: f64,
    pub suggested_price: f64,
}

impl PricingBreakdown {
    pub fn compute(cost_per_portion: f64, settings: &CostingSettings) -> Self {
        Self {
            cost_per_portion,
            labor_cost_percentage: settings.labor_cost_percentage,
            overhead_cost_percentage: settings.overhead_cost_percentage,
            target_profit_margin_percentage: settings.target_profit_margin_percentage,
            target_food_cost_percentage: settings.target_food_cost_percentage(),
            suggested_price: suggest_price(cost_per_portion, settings),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.target_food_cost_percentage <= 0.0
    }

    /// Food cost as a share of the suggested price, in percent
    pub fn food_cost_share(&self) -> f64 {
        if self.suggested_price > 0.0 {
            self.cost_per_portion / self.suggested_price * 100.0
        } else {
            0.0
        }
    }
}

/// A menu item prefilled from a recipe and its suggested price
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItemDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub recipe_id: String,
}

impl MenuItemDraft {
    pub fn from_pricing(recipe: &Recipe, pricing: &PricingBreakdown) -> Self {
        Self {
            name: recipe.name.clone(),
            description: String::new(),
            category: recipe.category.clone(),
            price: pricing.suggested_price,
            recipe_id: recipe.id.clone(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Finalize into a menu item; the price is rounded to two decimals and
    /// the id derived from `now`
    pub fn into_menu_item(self, now: DateTime<Utc>) -> MenuItem {
        MenuItem {
            id: format!("menu-{}", now.timestamp_millis()),
            name: self.name,
            description: self.description,
            price: (self.price * 100.0).round() / 100.0,
            category: self.category,
            recipe_id: Some(self.recipe_id),
        }
    }
}
