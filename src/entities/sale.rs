//! Sale entity - One recorded sale of a product.
//!
//! `total_revenue` is computed as `quantity * unit_price` when the sale is
//! created and stored as-is afterwards.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier for the sale
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the sale happened
    pub date: DateTimeUtc,
    /// Product that was sold
    pub product_id: i64,
    /// Units sold, at least 1
    pub quantity: i64,
    /// Price charged per unit
    pub unit_price: f64,
    /// `quantity * unit_price`, fixed at creation
    pub total_revenue: f64,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each sale references one product
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
