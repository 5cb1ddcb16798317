//! Component entity - Packaging and production supplies (lids, bottles, labels).
//!
//! Components are stock-tracked on their own and are not linked to products.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Component database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "components")]
pub struct Model {
    /// Unique identifier for the component
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the component (e.g., "4oz amber bottle")
    pub name: String,
    /// Category label used for grouping (e.g., "lid", "bottle", "label")
    #[sea_orm(column_name = "type")]
    pub component_type: String,
    /// Units on hand
    pub quantity: i64,
    /// At or below this quantity the component counts as low stock
    pub reorder_level: i64,
    /// Purchase cost per unit in dollars
    pub cost_per_unit: f64,
}

/// Components have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
