//! Component business logic - Handles packaging component storage.
//!
//! Components (lids, bottles, labels, ...) are tracked independently of products.
//! Every function validates its input before touching the database.

use crate::{
    core::{ensure_amount, ensure_name, next_id},
    entities::{Component, component},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{info, instrument};

const ENTITY: &str = "component";

/// Fields for creating a component.
#[derive(Debug, Clone, PartialEq)]
pub struct NewComponent {
    /// Component name
    pub name: String,
    /// Category label
    pub component_type: String,
    /// Units on hand
    pub quantity: i64,
    /// Low-stock threshold
    pub reorder_level: i64,
    /// Cost per unit
    pub cost_per_unit: f64,
}

/// Partial update for a component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentPatch {
    /// New name
    pub name: Option<String>,
    /// New category label
    pub component_type: Option<String>,
    /// New quantity on hand
    pub quantity: Option<i64>,
    /// New low-stock threshold
    pub reorder_level: Option<i64>,
    /// New cost per unit
    pub cost_per_unit: Option<f64>,
}

fn ensure_count(field: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(Error::validation(format!(
            "{field} cannot be negative, got {value}"
        )));
    }
    Ok(())
}

/// Retrieves every component, ordered by id.
pub async fn get_all_components<C>(db: &C) -> Result<Vec<component::Model>>
where
    C: ConnectionTrait,
{
    Component::find()
        .order_by_asc(component::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a component by id.
///
/// # Errors
/// Returns `Error::NotFound` when no component has this id.
pub async fn get_component_by_id<C>(db: &C, component_id: i64) -> Result<component::Model>
where
    C: ConnectionTrait,
{
    Component::find_by_id(component_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ENTITY, component_id))
}

/// Inserts a component on an existing connection or transaction.
pub(crate) async fn insert_component<C>(
    db: &C,
    new_component: &NewComponent,
) -> Result<component::Model>
where
    C: ConnectionTrait,
{
    let name = ensure_name("Component name", &new_component.name)?;
    let component_type = ensure_name("Component type", &new_component.component_type)?;
    ensure_count("Quantity", new_component.quantity)?;
    ensure_count("Reorder level", new_component.reorder_level)?;
    ensure_amount(new_component.cost_per_unit)?;

    let id = next_id::<Component, _>(db, component::Column::Id).await?;
    let model = component::ActiveModel {
        id: Set(id),
        name: Set(name),
        component_type: Set(component_type),
        quantity: Set(new_component.quantity),
        reorder_level: Set(new_component.reorder_level),
        cost_per_unit: Set(new_component.cost_per_unit),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Creates a new component, performing input validation.
///
/// # Errors
/// Returns an error if:
/// - The name or type is empty
/// - Quantity or reorder level is negative
/// - The cost is negative or not finite
/// - The database insert fails
#[instrument(skip(db, new_component), fields(name = %new_component.name))]
pub async fn create_component(
    db: &DatabaseConnection,
    new_component: NewComponent,
) -> Result<component::Model> {
    let created = insert_component(db, &new_component).await?;
    info!("Created component {}", created.id);
    Ok(created)
}

/// Merges a patch over an existing component.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown id and validation errors for bad patch values.
#[instrument(skip(db, patch))]
pub async fn update_component(
    db: &DatabaseConnection,
    component_id: i64,
    patch: ComponentPatch,
) -> Result<component::Model> {
    let name = patch
        .name
        .as_deref()
        .map(|name| ensure_name("Component name", name))
        .transpose()?;
    let component_type = patch
        .component_type
        .as_deref()
        .map(|kind| ensure_name("Component type", kind))
        .transpose()?;
    if let Some(quantity) = patch.quantity {
        ensure_count("Quantity", quantity)?;
    }
    if let Some(reorder_level) = patch.reorder_level {
        ensure_count("Reorder level", reorder_level)?;
    }
    if let Some(cost) = patch.cost_per_unit {
        ensure_amount(cost)?;
    }

    let mut active: component::ActiveModel = get_component_by_id(db, component_id).await?.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(component_type) = component_type {
        active.component_type = Set(component_type);
    }
    if let Some(quantity) = patch.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(reorder_level) = patch.reorder_level {
        active.reorder_level = Set(reorder_level);
    }
    if let Some(cost) = patch.cost_per_unit {
        active.cost_per_unit = Set(cost);
    }

    let updated = active.update(db).await?;
    info!("Updated component {}", component_id);
    Ok(updated)
}

/// Deletes a component.
///
/// # Errors
/// Returns `Error::NotFound` when no component has this id.
#[instrument(skip(db))]
pub async fn delete_component(db: &DatabaseConnection, component_id: i64) -> Result<bool> {
    let result = Component::delete_by_id(component_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(ENTITY, component_id));
    }
    info!("Deleted component {}", component_id);
    Ok(true)
}
