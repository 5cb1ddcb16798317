//! Seed catalog loading from config.toml
//!
//! The catalog lists the products (with their recipes) and packaging components
//! the ledger starts with. It is applied once, to an empty store.

use crate::{
    core::{
        component::{self, NewComponent},
        product::{self, NewProduct, NewRecipeLine},
    },
    entities::{Component, Product},
    errors::{Error, Result},
};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct CatalogConfig {
    /// Products to seed
    #[serde(default)]
    pub products: Vec<ProductConfig>,
    /// Components to seed
    #[serde(default)]
    pub components: Vec<ComponentConfig>,
}

/// Configuration for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Product name
    pub name: String,
    /// Opening stock
    #[serde(default)]
    pub current_stock: i64,
    /// List price per unit
    pub price_per_unit: f64,
    /// Units per standard batch
    pub batch_size: i64,
    /// Recipe lines in order
    #[serde(default)]
    pub recipe: Vec<RecipeLineConfig>,
}

/// Configuration for one recipe line
#[derive(Debug, Deserialize, Clone)]
pub struct RecipeLineConfig {
    /// Ingredient name
    pub ingredient: String,
    /// Grams per standard batch
    pub grams_per_batch: f64,
    /// Cost per gram
    pub cost_per_gram: f64,
}

/// Configuration for a single component
#[derive(Debug, Deserialize, Clone)]
pub struct ComponentConfig {
    /// Component name
    pub name: String,
    /// Category label ("lid", "bottle", "label", ...)
    #[serde(rename = "type")]
    pub component_type: String,
    /// Opening quantity
    #[serde(default)]
    pub quantity: i64,
    /// Low-stock threshold
    #[serde(default)]
    pub reorder_level: i64,
    /// Cost per unit
    pub cost_per_unit: f64,
}

impl From<&ProductConfig> for NewProduct {
    fn from(config: &ProductConfig) -> Self {
        Self {
            name: config.name.clone(),
            current_stock: config.current_stock,
            price_per_unit: config.price_per_unit,
            batch_size: config.batch_size,
            recipe: config
                .recipe
                .iter()
                .map(|line| NewRecipeLine {
                    ingredient: line.ingredient.clone(),
                    grams_per_batch: line.grams_per_batch,
                    cost_per_gram: line.cost_per_gram,
                })
                .collect(),
        }
    }
}

impl From<&ComponentConfig> for NewComponent {
    fn from(config: &ComponentConfig) -> Self {
        Self {
            name: config.name.clone(),
            component_type: config.component_type.clone(),
            quantity: config.quantity,
            reorder_level: config.reorder_level,
            cost_per_unit: config.cost_per_unit,
        }
    }
}

/// Parses a catalog from TOML text.
///
/// # Errors
/// Returns `Error::Config` when the TOML is invalid or required fields are missing.
pub fn parse_catalog(contents: &str) -> Result<CatalogConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog: {e}"),
    })
}

/// Loads the seed catalog from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or its contents do not parse.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load catalog from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file {}: {e}", path_ref.display()),
    })?;
    parse_catalog(&contents)
}

/// Inserts the catalog into an empty store.
///
/// Nothing is written when any product or component already exists, so calling this
/// on every start is safe. All inserts share one transaction.
///
/// # Returns
/// * `Ok(true)` - The catalog was seeded
/// * `Ok(false)` - The store already held data
#[instrument(skip(db, catalog))]
pub async fn seed_catalog(db: &DatabaseConnection, catalog: &CatalogConfig) -> Result<bool> {
    let existing = Product::find().count(db).await? + Component::find().count(db).await?;
    if existing > 0 {
        info!("Store already holds {} records, skipping seed.", existing);
        return Ok(false);
    }

    let txn = db.begin().await?;
    for product_config in &catalog.products {
        product::insert_product(&txn, &product_config.into()).await?;
    }
    for component_config in &catalog.components {
        component::insert_component(&txn, &component_config.into()).await?;
    }
    txn.commit().await?;

    info!(
        "Seeded {} products and {} components.",
        catalog.products.len(),
        catalog.components.len()
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::setup_test_db;

    const SAMPLE: &str = r#"
        [[products]]
        name = "Smoky Garlic Rub"
        current_stock = 24
        price_per_unit = 8.5
        batch_size = 12

        [[products.recipe]]
        ingredient = "Smoked paprika"
        grams_per_batch = 300.0
        cost_per_gram = 0.02

        [[products.recipe]]
        ingredient = "Granulated garlic"
        grams_per_batch = 150.0
        cost_per_gram = 0.03

        [[components]]
        name = "4oz amber bottle"
        type = "bottle"
        quantity = 200
        reorder_level = 50
        cost_per_unit = 0.45
    "#;

    #[test]
    fn test_parse_catalog() {
        let catalog = parse_catalog(SAMPLE).unwrap();
        assert_eq!(catalog.products.len(), 1);
        assert_eq!(catalog.products[0].name, "Smoky Garlic Rub");
        assert_eq!(catalog.products[0].recipe.len(), 2);
        assert_eq!(catalog.products[0].recipe[1].cost_per_gram, 0.03);
        assert_eq!(catalog.components[0].component_type, "bottle");
    }

    #[test]
    fn test_parse_catalog_missing_field() {
        let result = parse_catalog("[[products]]\nname = \"No price\"\nbatch_size = 1\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_empty_catalog_parses() {
        let catalog = parse_catalog("").unwrap();
        assert!(catalog.products.is_empty());
        assert!(catalog.components.is_empty());
    }

    #[tokio::test]
    async fn test_seed_catalog_only_once() -> Result<()> {
        let db = setup_test_db().await?;
        let catalog = parse_catalog(SAMPLE)?;

        assert!(seed_catalog(&db, &catalog).await?);
        assert!(!seed_catalog(&db, &catalog).await?);

        let products = product::get_all_products(&db).await?;
        assert_eq!(products.len(), 1);
        let detail = product::get_product_with_recipe(&db, products[0].id).await?;
        assert_eq!(detail.recipe.len(), 2);
        assert_eq!(detail.recipe[0].ingredient, "Smoked paprika");
        assert_eq!(component::get_all_components(&db).await?.len(), 1);

        Ok(())
    }
}
