//! Recipe cost calculator.
//!
//! Scales a product's standard recipe by a batch multiplier and derives batch cost,
//! unit cost and profit margin. Everything here is pure arithmetic: an empty recipe
//! costs nothing and a zero price has zero margin.

use crate::entities::{product, recipe_line};

/// Smallest multiplier accepted from user input.
pub const MIN_MULTIPLIER: f64 = 0.1;

/// One recipe line scaled to a production run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledLine {
    /// Ingredient name
    pub ingredient: String,
    /// `grams_per_batch * multiplier`
    pub scaled_grams: f64,
    /// `scaled_grams * cost_per_gram`
    pub scaled_cost: f64,
}

/// Cost breakdown of a product at a given multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct CostSheet {
    /// Multiplier the sheet was computed for
    pub multiplier: f64,
    /// Scaled recipe lines in recipe order
    pub lines: Vec<ScaledLine>,
    /// Sum of scaled grams
    pub total_grams: f64,
    /// Sum of scaled costs
    pub batch_cost: f64,
    /// Units the run yields, `floor(batch_size * multiplier)`
    pub units: i64,
    /// `batch_cost / batch_size`
    pub unit_cost: f64,
    /// List price minus unit cost
    pub profit_per_unit: f64,
    /// Profit as a percentage of the list price
    pub profit_margin: f64,
}

/// Scales every recipe line by `multiplier`.
#[must_use]
pub fn scaled_recipe(recipe: &[recipe_line::Model], multiplier: f64) -> Vec<ScaledLine> {
    recipe
        .iter()
        .map(|line| {
            let scaled_grams = line.grams_per_batch * multiplier;
            ScaledLine {
                ingredient: line.ingredient.clone(),
                scaled_grams,
                scaled_cost: scaled_grams * line.cost_per_gram,
            }
        })
        .collect()
}

/// Ingredient cost of a run at `multiplier`; 0 for an empty recipe.
#[must_use]
pub fn batch_cost(recipe: &[recipe_line::Model], multiplier: f64) -> f64 {
    recipe
        .iter()
        .map(|line| line.grams_per_batch * multiplier * line.cost_per_gram)
        .sum()
}

/// Cost of one unit, spreading `batch_cost` over at least one unit.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn unit_cost(batch_cost: f64, batch_size: i64) -> f64 {
    batch_cost / batch_size.max(1) as f64
}

/// Profit as a percentage of `unit_price`; 0 when the price is not positive.
///
/// With a non-negative cost the result never exceeds 100.
#[must_use]
pub fn profit_margin(unit_price: f64, unit_cost: f64) -> f64 {
    if unit_price > 0.0 {
        (unit_price - unit_cost) / unit_price * 100.0
    } else {
        0.0
    }
}

/// Applies the [`MIN_MULTIPLIER`] floor to a user-entered multiplier.
/// Non-finite values fall back to the floor.
#[must_use]
pub fn clamp_multiplier(value: f64) -> f64 {
    if value.is_finite() {
        value.max(MIN_MULTIPLIER)
    } else {
        MIN_MULTIPLIER
    }
}

/// Parses a multiplier typed by a user; anything unparsable becomes the floor.
#[must_use]
pub fn parse_multiplier(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .map_or(MIN_MULTIPLIER, clamp_multiplier)
}

/// Units a run of `multiplier` standard batches yields.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn units_for_multiplier(batch_size: i64, multiplier: f64) -> i64 {
    // Saturating float-to-int cast, floor first
    (batch_size.max(1) as f64 * multiplier).floor() as i64
}

/// Units a run of `multiplier` standard batches yields, or `None` when the count is
/// not finite or does not fit in an `i64`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn checked_units_for_multiplier(batch_size: i64, multiplier: f64) -> Option<i64> {
    let units = (batch_size.max(1) as f64 * multiplier).floor();
    // i64::MAX as f64 rounds up to 2^63, the first value that no longer fits
    (units.is_finite() && units >= i64::MIN as f64 && units < i64::MAX as f64)
        .then_some(units as i64)
}

/// Multiplier that a run of `units` represents.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn multiplier_for_units(units: i64, batch_size: i64) -> f64 {
    units as f64 / batch_size.max(1) as f64
}

/// Builds the cost breakdown shown on a product's detail view.
#[must_use]
pub fn cost_sheet(
    product: &product::Model,
    recipe: &[recipe_line::Model],
    multiplier: f64,
) -> CostSheet {
    let lines = scaled_recipe(recipe, multiplier);
    let total_grams = lines.iter().map(|line| line.scaled_grams).sum();
    let batch_cost = lines.iter().map(|line| line.scaled_cost).sum();
    let unit_cost = unit_cost(batch_cost, product.batch_size);

    CostSheet {
        multiplier,
        lines,
        total_grams,
        batch_cost,
        units: units_for_multiplier(product.batch_size, multiplier),
        unit_cost,
        profit_per_unit: product.price_per_unit - unit_cost,
        profit_margin: profit_margin(product.price_per_unit, unit_cost),
    }
}
