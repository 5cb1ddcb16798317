//! Inventory views over products and components.
//!
//! Products have no reorder level of their own; they are measured against the
//! configured low-stock threshold. Components carry their own `reorder_level`.

use crate::{
    core::{
        component::{self, ComponentPatch},
        product::{self, ProductPatch, ProductWithRecipe},
    },
    entities::{component as component_entity, product as product_entity},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::collections::BTreeMap;
use tracing::instrument;

/// Stock level relative to a reorder level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    /// At or below the reorder level
    Low,
    /// At or below twice the reorder level
    Medium,
    /// Above twice the reorder level
    InStock,
}

impl StockStatus {
    /// Classifies `stock` against `reorder_level`.
    #[must_use]
    pub const fn classify(stock: i64, reorder_level: i64) -> Self {
        if stock <= reorder_level {
            Self::Low
        } else if stock <= reorder_level.saturating_mul(2) {
            Self::Medium
        } else {
            Self::InStock
        }
    }

    /// Badge label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low Stock",
            Self::Medium => "Medium",
            Self::InStock => "In Stock",
        }
    }
}

/// Products whose stock is at or below `threshold`.
#[must_use]
pub fn low_stock_products(
    products: &[product_entity::Model],
    threshold: i64,
) -> Vec<&product_entity::Model> {
    products
        .iter()
        .filter(|product| product.current_stock <= threshold)
        .collect()
}

/// Components whose quantity is at or below their own reorder level.
#[must_use]
pub fn low_stock_components(
    components: &[component_entity::Model],
) -> Vec<&component_entity::Model> {
    components
        .iter()
        .filter(|component| component.quantity <= component.reorder_level)
        .collect()
}

/// Products whose name contains `term`, ignoring case. An empty term matches all.
#[must_use]
pub fn search_products<'a>(
    products: &'a [product_entity::Model],
    term: &str,
) -> Vec<&'a product_entity::Model> {
    let needle = term.trim().to_lowercase();
    products
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&needle))
        .collect()
}

/// Components whose name or type contains `term`, ignoring case.
#[must_use]
pub fn search_components<'a>(
    components: &'a [component_entity::Model],
    term: &str,
) -> Vec<&'a component_entity::Model> {
    let needle = term.trim().to_lowercase();
    components
        .iter()
        .filter(|component| {
            component.name.to_lowercase().contains(&needle)
                || component.component_type.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Components keyed by type, types in alphabetical order.
#[must_use]
pub fn group_components_by_type(
    components: &[component_entity::Model],
) -> BTreeMap<String, Vec<&component_entity::Model>> {
    let mut groups: BTreeMap<String, Vec<&component_entity::Model>> = BTreeMap::new();
    for component in components {
        groups
            .entry(component.component_type.clone())
            .or_default()
            .push(component);
    }
    groups
}

/// Sets a product's stock to an absolute value.
///
/// # Errors
/// Returns `Error::Validation` for negative stock and `Error::NotFound` for an unknown id.
#[instrument(skip(db))]
pub async fn set_product_stock(
    db: &DatabaseConnection,
    product_id: i64,
    current_stock: i64,
) -> Result<ProductWithRecipe> {
    product::update_product(
        db,
        product_id,
        ProductPatch {
            current_stock: Some(current_stock),
            ..ProductPatch::default()
        },
    )
    .await
}

/// Sets a component's quantity to an absolute value.
///
/// # Errors
/// Returns `Error::Validation` for a negative quantity and `Error::NotFound` for an unknown id.
#[instrument(skip(db))]
pub async fn set_component_quantity(
    db: &DatabaseConnection,
    component_id: i64,
    quantity: i64,
) -> Result<component_entity::Model> {
    component::update_component(
        db,
        component_id,
        ComponentPatch {
            quantity: Some(quantity),
            ..ComponentPatch::default()
        },
    )
    .await
}
