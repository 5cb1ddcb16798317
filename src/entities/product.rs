//! Product entity - A finished seasoning product that is produced and sold.
//!
//! Each product tracks its on-hand stock, list price and the number of units a
//! standard recipe batch yields. The recipe itself lives in `recipe_lines`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Smoky Garlic Rub")
    pub name: String,
    /// Units currently on hand, never negative
    pub current_stock: i64,
    /// List price per unit in dollars
    pub price_per_unit: f64,
    /// Units produced by one standard recipe batch
    pub batch_size: i64,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product has many recipe lines
    #[sea_orm(has_many = "super::recipe_line::Entity")]
    RecipeLines,
    /// One product has many sales
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
    /// One product has many production batches
    #[sea_orm(has_many = "super::production_batch::Entity")]
    ProductionBatches,
}

impl Related<super::recipe_line::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecipeLines.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl Related<super::production_batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductionBatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
