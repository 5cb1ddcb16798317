//! Entity module - Contains all SeaORM entity definitions for the ledger.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod component;
pub mod product;
pub mod production_batch;
pub mod recipe_line;
pub mod sale;
pub mod system_state;

// Re-export specific types to avoid conflicts
pub use component::{Column as ComponentColumn, Entity as Component, Model as ComponentModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use production_batch::{
    Column as ProductionBatchColumn, Entity as ProductionBatch, Model as ProductionBatchModel,
};
pub use recipe_line::{Column as RecipeLineColumn, Entity as RecipeLine, Model as RecipeLineModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
