//! Production batch entity - A logged production run of one product.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Production batch database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "production_batches")]
pub struct Model {
    /// Unique identifier for the batch
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product that was produced
    pub product_id: i64,
    /// When the batch was produced
    pub date: DateTimeUtc,
    /// Units produced
    pub quantity: i64,
    /// Ingredient cost of the whole batch in dollars
    pub total_cost: f64,
    /// Free-text notes, e.g. `"Batch of 2x standard size"`
    pub notes: Option<String>,
}

/// Defines relationships between `ProductionBatch` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each batch references one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
