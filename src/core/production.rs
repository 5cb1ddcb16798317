//! Production business logic - Handles production batches and production runs.
//!
//! Logging production creates a batch record and adds the produced units to the
//! product's stock. Both writes share one database transaction. The remaining
//! functions aggregate batch lists for the production history views.

use crate::{
    core::{costing, ensure_amount, next_id, product},
    entities::{ProductionBatch, product as product_entity, production_batch},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

const ENTITY: &str = "production batch";

/// Fields for creating a batch record directly.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBatch {
    /// Product that was produced
    pub product_id: i64,
    /// When the batch was produced
    pub date: DateTime<Utc>,
    /// Units produced, at least 1
    pub quantity: i64,
    /// Ingredient cost of the batch
    pub total_cost: f64,
    /// Optional notes
    pub notes: Option<String>,
}

/// Partial update for a stored batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchPatch {
    /// New product reference
    pub product_id: Option<i64>,
    /// New date
    pub date: Option<DateTime<Utc>>,
    /// New quantity
    pub quantity: Option<i64>,
    /// New total cost
    pub total_cost: Option<f64>,
    /// New notes; `Some(None)` clears them
    pub notes: Option<Option<String>>,
}

/// A production run entered as a unit count rather than a multiplier.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionRun {
    /// Product to produce
    pub product_id: i64,
    /// Units produced
    pub quantity: i64,
    /// When the run happened
    pub date: DateTime<Utc>,
    /// Optional notes
    pub notes: Option<String>,
}

/// Totals over a set of batches.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionTotals {
    /// Number of batches
    pub batch_count: usize,
    /// Units produced across all batches
    pub total_units: i64,
    /// Cost across all batches
    pub total_cost: f64,
    /// `total_cost / total_units`, 0 when nothing was produced
    pub average_unit_cost: f64,
}

fn ensure_quantity(quantity: i64) -> Result<()> {
    if quantity < 1 {
        return Err(Error::validation(format!(
            "Batch quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

/// Retrieves every batch, ordered by id.
pub async fn get_all_batches<C>(db: &C) -> Result<Vec<production_batch::Model>>
where
    C: ConnectionTrait,
{
    ProductionBatch::find()
        .order_by_asc(production_batch::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every batch, newest first (the production history order).
pub async fn get_batch_history(db: &DatabaseConnection) -> Result<Vec<production_batch::Model>> {
    ProductionBatch::find()
        .order_by_desc(production_batch::Column::Date)
        .order_by_desc(production_batch::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a batch by id.
///
/// # Errors
/// Returns `Error::NotFound` when no batch has this id.
pub async fn get_batch_by_id<C>(db: &C, batch_id: i64) -> Result<production_batch::Model>
where
    C: ConnectionTrait,
{
    ProductionBatch::find_by_id(batch_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ENTITY, batch_id))
}

/// Retrieves the batches of one product in id order; empty when there are none.
pub async fn get_batches_by_product_id<C>(
    db: &C,
    product_id: i64,
) -> Result<Vec<production_batch::Model>>
where
    C: ConnectionTrait,
{
    ProductionBatch::find()
        .filter(production_batch::Column::ProductId.eq(product_id))
        .order_by_asc(production_batch::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn insert_batch<C>(db: &C, new_batch: &NewBatch) -> Result<production_batch::Model>
where
    C: ConnectionTrait,
{
    let id = next_id::<ProductionBatch, _>(db, production_batch::Column::Id).await?;
    let model = production_batch::ActiveModel {
        id: Set(id),
        product_id: Set(new_batch.product_id),
        date: Set(new_batch.date),
        quantity: Set(new_batch.quantity),
        total_cost: Set(new_batch.total_cost),
        notes: Set(new_batch.notes.clone()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Stores a batch record without changing stock.
///
/// # Errors
/// Returns an error for a quantity below 1, an invalid cost, an unknown product, or a
/// failed insert.
#[instrument(skip(db, new_batch))]
pub async fn create_batch(
    db: &DatabaseConnection,
    new_batch: NewBatch,
) -> Result<production_batch::Model> {
    ensure_quantity(new_batch.quantity)?;
    ensure_amount(new_batch.total_cost)?;
    product::get_product_by_id(db, new_batch.product_id).await?;

    let created = insert_batch(db, &new_batch).await?;
    info!("Created production batch {}", created.id);
    Ok(created)
}

/// Writes a batch and its stock increment in one transaction.
async fn commit_batch(
    db: &DatabaseConnection,
    new_batch: NewBatch,
) -> Result<(production_batch::Model, product_entity::Model)> {
    let txn = db.begin().await?;
    let batch = insert_batch(&txn, &new_batch).await?;
    let product = product::adjust_stock_atomic(&txn, new_batch.product_id, batch.quantity).await?;
    txn.commit().await?;
    Ok((batch, product))
}

/// Produces `multiplier` standard batches of a product.
///
/// The run yields `floor(batch_size * multiplier)` units at the recipe's batch cost for
/// that multiplier. The batch record and the stock increment commit together; if
/// either write fails nothing is kept and the error is returned.
///
/// # Errors
/// Returns an error if:
/// - The multiplier is not finite or not positive (`Error::InvalidAmount`)
/// - The run would yield zero units, or more than fit in a stock count (`Error::Validation`)
/// - The product does not exist
/// - Any database write fails
#[instrument(skip(db))]
pub async fn log_production(
    db: &DatabaseConnection,
    product_id: i64,
    multiplier: f64,
) -> Result<production_batch::Model> {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(Error::InvalidAmount { amount: multiplier });
    }

    let detail = product::get_product_with_recipe(db, product_id).await?;
    let quantity = costing::checked_units_for_multiplier(detail.product.batch_size, multiplier)
        .ok_or_else(|| {
            Error::validation(format!(
                "A {multiplier}x run of product {product_id} yields too many units"
            ))
        })?;
    if quantity < 1 {
        return Err(Error::validation(format!(
            "A {multiplier}x run of product {product_id} yields no units"
        )));
    }

    let new_batch = NewBatch {
        product_id,
        date: Utc::now(),
        quantity,
        total_cost: costing::batch_cost(&detail.recipe, multiplier),
        notes: Some(format!("Batch of {multiplier}x standard size")),
    };
    let (batch, product) = commit_batch(db, new_batch).await?;

    info!(
        "Logged production batch {}: {} units of product {}, stock now {}",
        batch.id, batch.quantity, product_id, product.current_stock
    );
    Ok(batch)
}

/// Logs a production run given as a unit count.
///
/// The recipe is scaled by `quantity / batch_size` to price the run, and `quantity`
/// units are added to stock in the same transaction as the batch record.
///
/// # Errors
/// Returns an error for a quantity below 1, an unknown product, or a failed write.
#[instrument(skip(db, run), fields(product_id = run.product_id, quantity = run.quantity))]
pub async fn log_production_run(
    db: &DatabaseConnection,
    run: ProductionRun,
) -> Result<production_batch::Model> {
    ensure_quantity(run.quantity)?;

    let detail = product::get_product_with_recipe(db, run.product_id).await?;
    let multiplier = costing::multiplier_for_units(run.quantity, detail.product.batch_size);

    let new_batch = NewBatch {
        product_id: run.product_id,
        date: run.date,
        quantity: run.quantity,
        total_cost: costing::batch_cost(&detail.recipe, multiplier),
        notes: run.notes.filter(|notes| !notes.trim().is_empty()),
    };
    let (batch, product) = commit_batch(db, new_batch).await?;

    info!(
        "Logged production run {}: {} units of product {}, stock now {}",
        batch.id, batch.quantity, run.product_id, product.current_stock
    );
    Ok(batch)
}

/// Merges a patch over an existing batch. Stock is not adjusted.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown batch or product and validation errors for
/// bad patch values.
#[instrument(skip(db, patch))]
pub async fn update_batch(
    db: &DatabaseConnection,
    batch_id: i64,
    patch: BatchPatch,
) -> Result<production_batch::Model> {
    if let Some(quantity) = patch.quantity {
        ensure_quantity(quantity)?;
    }
    if let Some(cost) = patch.total_cost {
        ensure_amount(cost)?;
    }

    let mut active: production_batch::ActiveModel = get_batch_by_id(db, batch_id).await?.into();
    if let Some(product_id) = patch.product_id {
        product::get_product_by_id(db, product_id).await?;
        active.product_id = Set(product_id);
    }
    if let Some(date) = patch.date {
        active.date = Set(date);
    }
    if let Some(quantity) = patch.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(cost) = patch.total_cost {
        active.total_cost = Set(cost);
    }
    if let Some(notes) = patch.notes {
        active.notes = Set(notes);
    }

    let updated = active.update(db).await?;
    info!("Updated production batch {}", batch_id);
    Ok(updated)
}

/// Deletes a batch. Stock is not reduced.
///
/// # Errors
/// Returns `Error::NotFound` when no batch has this id.
#[instrument(skip(db))]
pub async fn delete_batch(db: &DatabaseConnection, batch_id: i64) -> Result<bool> {
    let result = ProductionBatch::delete_by_id(batch_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(ENTITY, batch_id));
    }
    info!("Deleted production batch {}", batch_id);
    Ok(true)
}

/// Cost per produced unit of one batch.
///
/// # Errors
/// Returns `Error::EmptyBatch` when the batch quantity is zero or negative.
#[allow(clippy::cast_precision_loss)]
pub fn batch_cost_per_unit(batch: &production_batch::Model) -> Result<f64> {
    if batch.quantity <= 0 {
        return Err(Error::EmptyBatch { batch_id: batch.id });
    }
    Ok(batch.total_cost / batch.quantity as f64)
}

/// Units produced across the batches.
#[must_use]
pub fn total_units_produced(batches: &[production_batch::Model]) -> i64 {
    batches.iter().map(|batch| batch.quantity).sum()
}

/// Cost across the batches.
#[must_use]
pub fn total_production_cost(batches: &[production_batch::Model]) -> f64 {
    batches.iter().map(|batch| batch.total_cost).sum()
}

/// Count, units, cost and average unit cost across the batches.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn production_totals(batches: &[production_batch::Model]) -> ProductionTotals {
    let total_units = total_units_produced(batches);
    let total_cost = total_production_cost(batches);
    let average_unit_cost = if total_units > 0 {
        total_cost / total_units as f64
    } else {
        0.0
    };

    ProductionTotals {
        batch_count: batches.len(),
        total_units,
        total_cost,
        average_unit_cost,
    }
}

/// Filters batches whose product name or notes contain `term`, ignoring case.
///
/// An empty term keeps every batch.
#[must_use]
pub fn search_batches<'a>(
    batches: &'a [production_batch::Model],
    products: &[product_entity::Model],
    term: &str,
) -> Vec<&'a production_batch::Model> {
    let needle = term.trim().to_lowercase();
    batches
        .iter()
        .filter(|batch| {
            let name_matches = products
                .iter()
                .find(|product| product.id == batch.product_id)
                .is_some_and(|product| product.name.to_lowercase().contains(&needle));
            let notes_match = batch
                .notes
                .as_deref()
                .is_some_and(|notes| notes.to_lowercase().contains(&needle));
            needle.is_empty() || name_matches || notes_match
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn batch(
        id: i64,
        product_id: i64,
        quantity: i64,
        total_cost: f64,
        notes: Option<&str>,
    ) -> production_batch::Model {
        production_batch::Model {
            id,
            product_id,
            date: Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
            quantity,
            total_cost,
            notes: notes.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_log_production_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for multiplier in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = log_production(&db, 1, multiplier).await;
            assert!(matches!(result.unwrap_err(), Error::InvalidAmount { .. }));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_log_production_concrete_scenario() -> Result<()> {
        // batch_size 10, 100g at 0.05/g, stock 20, multiplier 2
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;

        let batch = log_production(&db, id, 2.0).await?;

        assert_eq!(batch.quantity, 20);
        assert!((batch.total_cost - 10.0).abs() < 1e-9);
        assert_eq!(batch.notes.as_deref(), Some("Batch of 2x standard size"));
        assert_eq!(product::get_product_by_id(&db, id).await?.current_stock, 40);

        Ok(())
    }

    #[tokio::test]
    async fn test_log_production_floors_quantity() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;

        let batch = log_production(&db, id, 1.55).await?;

        assert_eq!(batch.quantity, 15);
        assert_eq!(batch.notes.as_deref(), Some("Batch of 1.55x standard size"));
        assert_eq!(product::get_product_by_id(&db, id).await?.current_stock, 35);

        Ok(())
    }

    #[tokio::test]
    async fn test_log_production_zero_units_rejected() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;

        let result = log_production(&db, id, 0.05).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert!(get_all_batches(&db).await?.is_empty());
        assert_eq!(product::get_product_by_id(&db, id).await?.current_stock, 20);

        Ok(())
    }

    #[tokio::test]
    async fn test_log_production_oversized_run_rejected() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;

        let result = log_production(&db, id, 1e18).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert!(get_all_batches(&db).await?.is_empty());
        assert_eq!(product::get_product_by_id(&db, id).await?.current_stock, 20);

        Ok(())
    }

    #[tokio::test]
    async fn test_log_production_run_rolls_back_batch_when_stock_update_fails() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;

        // The batch insert succeeds; adding i64::MAX units to 20 in stock then fails
        let result = log_production_run(
            &db,
            ProductionRun {
                product_id: id,
                quantity: i64::MAX,
                date: Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap(),
                notes: None,
            },
        )
        .await;

        assert!(matches!(result.unwrap_err(), Error::Validation { .. }));
        assert!(get_all_batches(&db).await?.is_empty());
        assert_eq!(product::get_product_by_id(&db, id).await?.current_stock, 20);

        Ok(())
    }

    #[tokio::test]
    async fn test_log_production_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;

        let result = log_production(&db, 5, 1.0).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { id: 5, .. }));
        assert!(get_all_batches(&db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_log_production_run_scales_cost() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;

        // 5 units of a 10-unit batch is a 0.5x run: 50g at 0.05/g
        let batch = log_production_run(
            &db,
            ProductionRun {
                product_id: id,
                quantity: 5,
                date: Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap(),
                notes: Some("Half batch for market".to_string()),
            },
        )
        .await?;

        assert_eq!(batch.quantity, 5);
        assert!((batch.total_cost - 2.5).abs() < 1e-9);
        assert_eq!(product::get_product_by_id(&db, id).await?.current_stock, 25);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_batches_by_product_id() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;
        log_production(&db, id, 1.0).await?;
        log_production(&db, id, 2.0).await?;

        let batches = get_batches_by_product_id(&db, id).await?;
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].quantity, 10);
        assert_eq!(batches[1].quantity, 20);

        // Unknown products give an empty list, not an error
        assert!(get_batches_by_product_id(&db, 99).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_batch_crud_integration() -> Result<()> {
        let (db, product) = setup_with_product().await?;
        let id = product.product.id;

        let created = create_batch(
            &db,
            NewBatch {
                product_id: id,
                date: Utc.with_ymd_and_hms(2024, 4, 3, 10, 0, 0).unwrap(),
                quantity: 12,
                total_cost: 6.0,
                notes: None,
            },
        )
        .await?;
        // Direct creation does not move stock
        assert_eq!(product::get_product_by_id(&db, id).await?.current_stock, 20);

        let updated = update_batch(
            &db,
            created.id,
            BatchPatch {
                notes: Some(Some("Re-weighed".to_string())),
                ..BatchPatch::default()
            },
        )
        .await?;
        assert_eq!(updated.notes.as_deref(), Some("Re-weighed"));
        assert_eq!(updated.quantity, 12);

        assert!(delete_batch(&db, created.id).await?);
        assert!(matches!(
            get_batch_by_id(&db, created.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            delete_batch(&db, created.id).await.unwrap_err(),
            Error::NotFound { .. }
        ));

        Ok(())
    }

    #[test]
    fn test_batch_cost_per_unit() {
        assert_eq!(batch_cost_per_unit(&batch(1, 1, 20, 10.0, None)).unwrap(), 0.5);
        assert!(matches!(
            batch_cost_per_unit(&batch(2, 1, 0, 10.0, None)),
            Err(Error::EmptyBatch { batch_id: 2 })
        ));
    }

    #[test]
    fn test_production_totals() {
        let batches = vec![batch(1, 1, 10, 5.0, None), batch(2, 2, 30, 10.0, None)];

        let totals = production_totals(&batches);
        assert_eq!(totals.batch_count, 2);
        assert_eq!(totals.total_units, 40);
        assert_eq!(totals.total_cost, 15.0);
        assert_eq!(totals.average_unit_cost, 0.375);

        let empty = production_totals(&[]);
        assert_eq!(empty.total_units, 0);
        assert_eq!(empty.average_unit_cost, 0.0);
    }

    #[test]
    fn test_search_batches() {
        let products = vec![
            test_product_model(1, "Smoky Garlic Rub", 20),
            test_product_model(2, "Lemon Pepper", 20),
        ];
        let batches = vec![
            batch(1, 1, 10, 5.0, None),
            batch(2, 2, 10, 5.0, Some("Farmers market SMOKE test")),
            batch(3, 2, 10, 5.0, None),
        ];

        let ids: Vec<i64> = search_batches(&batches, &products, "smok")
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);

        assert_eq!(search_batches(&batches, &products, "").len(), 3);
        assert!(search_batches(&batches, &products, "paprika").is_empty());
    }
}
