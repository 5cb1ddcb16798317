//! Shared test utilities for `FlavorJunkie`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        component::NewComponent,
        product::{self, NewProduct, NewRecipeLine, ProductWithRecipe},
        sale::{self, NewSale},
    },
    entities,
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

fn paprika_recipe() -> Vec<NewRecipeLine> {
    vec![NewRecipeLine {
        ingredient: "Smoked paprika".to_string(),
        grams_per_batch: 100.0,
        cost_per_gram: 0.05,
    }]
}

/// Creates a test product with sensible defaults.
///
/// # Defaults
/// * `current_stock`: 20
/// * `price_per_unit`: 5.0
/// * `batch_size`: 10
/// * recipe: 100g smoked paprika at 0.05 per gram
pub async fn create_test_product(db: &DatabaseConnection, name: &str) -> Result<ProductWithRecipe> {
    create_custom_product(db, name, 20, 5.0).await
}

/// Creates a test product with custom stock and price.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    current_stock: i64,
    price_per_unit: f64,
) -> Result<ProductWithRecipe> {
    product::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            current_stock,
            price_per_unit,
            batch_size: 10,
            recipe: paprika_recipe(),
        },
    )
    .await
}

/// Records a sale at the product's list price, decrementing stock.
pub async fn create_test_sale(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i64,
) -> Result<entities::sale::Model> {
    create_dated_sale(db, product_id, quantity, Utc::now()).await
}

/// Records a sale at the product's list price on a given date.
pub async fn create_dated_sale(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i64,
    date: DateTime<Utc>,
) -> Result<entities::sale::Model> {
    let product = product::get_product_by_id(db, product_id).await?;
    sale::record_sale(db, NewSale::at_list_price(&product, quantity, date)).await
}

/// Sets up a complete test environment with one product ("Smoky Rub").
/// Returns (db, product) for common test scenarios.
pub async fn setup_with_product() -> Result<(DatabaseConnection, ProductWithRecipe)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Smoky Rub").await?;
    Ok((db, product))
}

/// Builds a component request with zero stock and a reorder level of 10.
pub fn new_test_component(name: &str, component_type: &str) -> NewComponent {
    NewComponent {
        name: name.to_string(),
        component_type: component_type.to_string(),
        quantity: 0,
        reorder_level: 10,
        cost_per_unit: 0.25,
    }
}

fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// An unsaved product row for pure-function tests. Price 5.0, batch size 10.
pub fn test_product_model(id: i64, name: &str, current_stock: i64) -> entities::product::Model {
    entities::product::Model {
        id,
        name: name.to_string(),
        current_stock,
        price_per_unit: 5.0,
        batch_size: 10,
        created_at: fixed_timestamp(),
        updated_at: fixed_timestamp(),
    }
}

/// An unsaved recipe line at position 0.
pub fn test_recipe_line(
    id: i64,
    product_id: i64,
    ingredient: &str,
    grams_per_batch: f64,
    cost_per_gram: f64,
) -> entities::recipe_line::Model {
    entities::recipe_line::Model {
        id,
        product_id,
        position: 0,
        ingredient: ingredient.to_string(),
        grams_per_batch,
        cost_per_gram,
    }
}

/// An unsaved sale row; `total_revenue` is `quantity * unit_price`.
#[allow(clippy::cast_precision_loss)]
pub fn test_sale_model(
    id: i64,
    product_id: i64,
    quantity: i64,
    unit_price: f64,
    date: DateTime<Utc>,
) -> entities::sale::Model {
    entities::sale::Model {
        id,
        date,
        product_id,
        quantity,
        unit_price,
        total_revenue: quantity as f64 * unit_price,
    }
}

/// An unsaved component row.
pub fn test_component_model(
    id: i64,
    name: &str,
    component_type: &str,
    quantity: i64,
    reorder_level: i64,
) -> entities::component::Model {
    entities::component::Model {
        id,
        name: name.to_string(),
        component_type: component_type.to_string(),
        quantity,
        reorder_level,
        cost_per_unit: 0.25,
    }
}
