//! Sale business logic - Handles sale storage and recording sales against stock.
//!
//! [`create_sale`] is the plain store operation: it validates and stores a sale
//! without touching stock. [`record_sale`] is what the sales screen uses: it checks the
//! product has enough stock, stores the sale and decrements stock in one database
//! transaction, so a failure leaves neither write behind.

use crate::{
    core::{ensure_amount, next_id, product},
    entities::{Sale, product as product_entity, sale},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

const ENTITY: &str = "sale";

/// Fields for a new sale. `total_revenue` is derived, never supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    /// Product being sold
    pub product_id: i64,
    /// Units sold, at least 1
    pub quantity: i64,
    /// Price charged per unit
    pub unit_price: f64,
    /// When the sale happened
    pub date: DateTime<Utc>,
}

impl NewSale {
    /// A sale at the product's list price.
    #[must_use]
    pub fn at_list_price(
        product: &product_entity::Model,
        quantity: i64,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id: product.id,
            quantity,
            unit_price: product.price_per_unit,
            date,
        }
    }

    /// `quantity * unit_price`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn total_revenue(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Partial update for a stored sale.
///
/// Fields are merged as given; `total_revenue` keeps the value computed when the sale
/// was created unless it is patched explicitly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalePatch {
    /// New sale date
    pub date: Option<DateTime<Utc>>,
    /// New product reference
    pub product_id: Option<i64>,
    /// New quantity
    pub quantity: Option<i64>,
    /// New unit price
    pub unit_price: Option<f64>,
    /// New stored revenue
    pub total_revenue: Option<f64>,
}

fn ensure_quantity(quantity: i64) -> Result<()> {
    if quantity < 1 {
        return Err(Error::validation(format!(
            "Sale quantity must be at least 1, got {quantity}"
        )));
    }
    Ok(())
}

fn validate_new_sale(new_sale: &NewSale) -> Result<()> {
    ensure_quantity(new_sale.quantity)?;
    ensure_amount(new_sale.unit_price)
}

/// Retrieves every sale, ordered by id.
pub async fn get_all_sales<C>(db: &C) -> Result<Vec<sale::Model>>
where
    C: ConnectionTrait,
{
    Sale::find()
        .order_by_asc(sale::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the most recent sales, newest first.
pub async fn get_recent_sales(db: &DatabaseConnection, limit: u64) -> Result<Vec<sale::Model>> {
    use sea_orm::QuerySelect;

    Sale::find()
        .order_by_desc(sale::Column::Date)
        .order_by_desc(sale::Column::Id)
        .limit(limit)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a sale by id.
///
/// # Errors
/// Returns `Error::NotFound` when no sale has this id.
pub async fn get_sale_by_id<C>(db: &C, sale_id: i64) -> Result<sale::Model>
where
    C: ConnectionTrait,
{
    Sale::find_by_id(sale_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ENTITY, sale_id))
}

async fn insert_sale<C>(db: &C, new_sale: &NewSale) -> Result<sale::Model>
where
    C: ConnectionTrait,
{
    let id = next_id::<Sale, _>(db, sale::Column::Id).await?;
    let model = sale::ActiveModel {
        id: Set(id),
        date: Set(new_sale.date),
        product_id: Set(new_sale.product_id),
        quantity: Set(new_sale.quantity),
        unit_price: Set(new_sale.unit_price),
        total_revenue: Set(new_sale.total_revenue()),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Stores a sale without changing stock.
///
/// # Errors
/// Returns an error if:
/// - The quantity is below 1
/// - The unit price is negative or not finite
/// - The referenced product does not exist
/// - The database insert fails
#[instrument(skip(db))]
pub async fn create_sale(db: &DatabaseConnection, new_sale: NewSale) -> Result<sale::Model> {
    validate_new_sale(&new_sale)?;
    product::get_product_by_id(db, new_sale.product_id).await?;

    let created = insert_sale(db, &new_sale).await?;
    info!("Created sale {}", created.id);
    Ok(created)
}

/// Records a sale and takes the sold units out of stock.
///
/// Stock is checked before anything is written; the sale insert and the stock
/// decrement then commit together or not at all.
///
/// # Errors
/// Returns an error if:
/// - The quantity is below 1 or the unit price is invalid
/// - The product does not exist (`Error::NotFound`)
/// - The product has fewer units than requested (`Error::InsufficientStock`)
/// - Any database write fails (nothing is committed)
#[instrument(skip(db))]
pub async fn record_sale(db: &DatabaseConnection, new_sale: NewSale) -> Result<sale::Model> {
    validate_new_sale(&new_sale)?;

    let txn = db.begin().await?;

    let product = product::get_product_by_id(&txn, new_sale.product_id).await?;
    if product.current_stock < new_sale.quantity {
        warn!(
            "Rejected sale of {} units of product {}: only {} in stock",
            new_sale.quantity, product.id, product.current_stock
        );
        return Err(Error::InsufficientStock {
            product_id: product.id,
            available: product.current_stock,
            requested: new_sale.quantity,
        });
    }

    let created = insert_sale(&txn, &new_sale).await?;
    product::adjust_stock_atomic(&txn, product.id, -new_sale.quantity).await?;

    txn.commit().await?;

    info!(
        "Recorded sale {}: {} x product {} for {:.2}",
        created.id, created.quantity, created.product_id, created.total_revenue
    );
    Ok(created)
}

/// Merges a patch over an existing sale.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown sale or product and validation errors
/// for bad patch values.
#[instrument(skip(db, patch))]
pub async fn update_sale(
    db: &DatabaseConnection,
    sale_id: i64,
    patch: SalePatch,
) -> Result<sale::Model> {
    if let Some(quantity) = patch.quantity {
        ensure_quantity(quantity)?;
    }
    if let Some(price) = patch.unit_price {
        ensure_amount(price)?;
    }
    if let Some(revenue) = patch.total_revenue {
        ensure_amount(revenue)?;
    }

    let mut active: sale::ActiveModel = get_sale_by_id(db, sale_id).await?.into();
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
    if let Some(price) = patch.unit_price {
        active.unit_price = Set(price);
    }
    if let Some(revenue) = patch.total_revenue {
        active.total_revenue = Set(revenue);
    }

    let updated = active.update(db).await?;
    info!("Updated sale {}", sale_id);
    Ok(updated)
}

/// Deletes a sale. Stock is not restored.
///
/// # Errors
/// Returns `Error::NotFound` when no sale has this id.
#[instrument(skip(db))]
pub async fn delete_sale(db: &DatabaseConnection, sale_id: i64) -> Result<bool> {
    let result = Sale::delete_by_id(sale_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::not_found(ENTITY, sale_id));
    }
    info!("Deleted sale {}", sale_id);
    Ok(true)
}
