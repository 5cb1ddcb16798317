//! Product business logic - Handles product and recipe storage.
//!
//! A product owns an ordered recipe (stored as `recipe_lines` rows). Products are
//! created together with their recipe in a single transaction, and a recipe is only
//! ever replaced as a whole. Stock changes go through [`adjust_stock_atomic`], which
//! refuses to take stock below zero.

use crate::{
    core::{ensure_amount, ensure_name, next_id},
    entities::{
        Product, ProductionBatch, RecipeLine, Sale, product, production_batch, recipe_line, sale,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{info, instrument};

const ENTITY: &str = "product";

/// One ingredient line of a recipe that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipeLine {
    /// Ingredient name
    pub ingredient: String,
    /// Grams used by one standard batch
    pub grams_per_batch: f64,
    /// Cost per gram
    pub cost_per_gram: f64,
}

/// Fields for creating a product.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    /// Product name
    pub name: String,
    /// Opening stock
    pub current_stock: i64,
    /// List price per unit
    pub price_per_unit: f64,
    /// Units produced by one standard batch
    pub batch_size: i64,
    /// Recipe lines in order
    pub recipe: Vec<NewRecipeLine>,
}

/// Partial update for a product. `None` fields keep their stored value; a `Some`
/// recipe replaces the whole recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    /// New name
    pub name: Option<String>,
    /// New stock level
    pub current_stock: Option<i64>,
    /// New list price
    pub price_per_unit: Option<f64>,
    /// New standard batch size
    pub batch_size: Option<i64>,
    /// Replacement recipe
    pub recipe: Option<Vec<NewRecipeLine>>,
}

/// A product together with its recipe lines, ordered by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductWithRecipe {
    /// The product row
    pub product: product::Model,
    /// Its recipe, possibly empty
    pub recipe: Vec<recipe_line::Model>,
}

fn ensure_stock(stock: i64) -> Result<()> {
    if stock < 0 {
        return Err(Error::validation(format!(
            "Stock cannot be negative, got {stock}"
        )));
    }
    Ok(())
}

fn ensure_batch_size(batch_size: i64) -> Result<()> {
    if batch_size < 1 {
        return Err(Error::validation(format!(
            "Batch size must be at least 1, got {batch_size}"
        )));
    }
    Ok(())
}

fn validate_recipe(recipe: &[NewRecipeLine]) -> Result<()> {
    for line in recipe {
        ensure_name("Ingredient name", &line.ingredient)?;
        ensure_amount(line.grams_per_batch)?;
        ensure_amount(line.cost_per_gram)?;
    }
    Ok(())
}

fn validate_new_product(new_product: &NewProduct) -> Result<String> {
    let name = ensure_name("Product name", &new_product.name)?;
    ensure_stock(new_product.current_stock)?;
    ensure_amount(new_product.price_per_unit)?;
    ensure_batch_size(new_product.batch_size)?;
    validate_recipe(&new_product.recipe)?;
    Ok(name)
}

/// Retrieves every product, ordered by id.
pub async fn get_all_products<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .order_by_asc(product::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by id.
///
/// # Errors
/// Returns `Error::NotFound` when no product has this id.
pub async fn get_product_by_id<C>(db: &C, product_id: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(ENTITY, product_id))
}

/// Retrieves the recipe lines of a product in recipe order.
///
/// An unknown product id yields an empty recipe.
pub async fn get_recipe<C>(db: &C, product_id: i64) -> Result<Vec<recipe_line::Model>>
where
    C: ConnectionTrait,
{
    RecipeLine::find()
        .filter(recipe_line::Column::ProductId.eq(product_id))
        .order_by_asc(recipe_line::Column::Position)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product together with its recipe.
///
/// # Errors
/// Returns `Error::NotFound` when no product has this id.
pub async fn get_product_with_recipe<C>(db: &C, product_id: i64) -> Result<ProductWithRecipe>
where
    C: ConnectionTrait,
{
    let product = get_product_by_id(db, product_id).await?;
    let recipe = get_recipe(db, product_id).await?;
    Ok(ProductWithRecipe { product, recipe })
}

async fn insert_recipe<C>(
    db: &C,
    product_id: i64,
    recipe: &[NewRecipeLine],
) -> Result<Vec<recipe_line::Model>>
where
    C: ConnectionTrait,
{
    let mut lines = Vec::with_capacity(recipe.len());
    for (position, line) in recipe.iter().enumerate() {
        let id = next_id::<RecipeLine, _>(db, recipe_line::Column::Id).await?;
        let model = recipe_line::ActiveModel {
            id: Set(id),
            product_id: Set(product_id),
            position: Set(i32::try_from(position)?),
            ingredient: Set(line.ingredient.trim().to_string()),
            grams_per_batch: Set(line.grams_per_batch),
            cost_per_gram: Set(line.cost_per_gram),
        };
        lines.push(model.insert(db).await?);
    }
    Ok(lines)
}

/// Inserts a product and its recipe on an existing connection or transaction.
pub(crate) async fn insert_product<C>(db: &C, new_product: &NewProduct) -> Result<ProductWithRecipe>
where
    C: ConnectionTrait,
{
    let name = validate_new_product(new_product)?;
    let id = next_id::<Product, _>(db, product::Column::Id).await?;
    let now = chrono::Utc::now();

    let model = product::ActiveModel {
        id: Set(id),
        name: Set(name),
        current_stock: Set(new_product.current_stock),
        price_per_unit: Set(new_product.price_per_unit),
        batch_size: Set(new_product.batch_size),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let product = model.insert(db).await?;
    let recipe = insert_recipe(db, product.id, &new_product.recipe).await?;

    Ok(ProductWithRecipe { product, recipe })
}

/// Creates a product with its recipe, performing input validation.
///
/// The product row and all recipe lines are written in one transaction.
///
/// # Errors
/// Returns an error if:
/// - The name or an ingredient name is empty
/// - Stock is negative or the batch size is below 1
/// - A price, gram amount or cost is negative or not finite
/// - The database insert fails
#[instrument(skip(db, new_product), fields(name = %new_product.name))]
pub async fn create_product(
    db: &DatabaseConnection,
    new_product: NewProduct,
) -> Result<ProductWithRecipe> {
    validate_new_product(&new_product)?;

    let txn = db.begin().await?;
    let created = insert_product(&txn, &new_product).await?;
    txn.commit().await?;

    info!(
        "Created product {} with {} recipe lines",
        created.product.id,
        created.recipe.len()
    );
    Ok(created)
}

/// Merges a patch over an existing product.
///
/// Only the `Some` fields of the patch are written. A replacement recipe deletes the
/// old lines and inserts the new ones in the same transaction as the product update.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown id, and the same validation errors as
/// [`create_product`] for patch values.
#[instrument(skip(db, patch))]
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    patch: ProductPatch,
) -> Result<ProductWithRecipe> {
    let name = patch
        .name
        .as_deref()
        .map(|name| ensure_name("Product name", name))
        .transpose()?;
    if let Some(stock) = patch.current_stock {
        ensure_stock(stock)?;
    }
    if let Some(price) = patch.price_per_unit {
        ensure_amount(price)?;
    }
    if let Some(batch_size) = patch.batch_size {
        ensure_batch_size(batch_size)?;
    }
    if let Some(recipe) = &patch.recipe {
        validate_recipe(recipe)?;
    }

    let txn = db.begin().await?;

    let mut active: product::ActiveModel = get_product_by_id(&txn, product_id).await?.into();
    if let Some(name) = name {
        active.name = Set(name);
    }
    if let Some(stock) = patch.current_stock {
        active.current_stock = Set(stock);
    }
    if let Some(price) = patch.price_per_unit {
        active.price_per_unit = Set(price);
    }
    if let Some(batch_size) = patch.batch_size {
        active.batch_size = Set(batch_size);
    }
    active.updated_at = Set(chrono::Utc::now());
    let product = active.update(&txn).await?;

    let recipe = if let Some(new_recipe) = &patch.recipe {
        RecipeLine::delete_many()
            .filter(recipe_line::Column::ProductId.eq(product_id))
            .exec(&txn)
            .await?;
        insert_recipe(&txn, product_id, new_recipe).await?
    } else {
        get_recipe(&txn, product_id).await?
    };

    txn.commit().await?;
    info!("Updated product {}", product_id);
    Ok(ProductWithRecipe { product, recipe })
}

/// Deletes a product and its recipe.
///
/// Deletion is refused while any sale or production batch still references the
/// product, so history never points at a missing product.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown id and `Error::ProductInUse` when
/// history references the product.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<bool> {
    let txn = db.begin().await?;

    get_product_by_id(&txn, product_id).await?;

    let sales = Sale::find()
        .filter(sale::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    let batches = ProductionBatch::find()
        .filter(production_batch::Column::ProductId.eq(product_id))
        .count(&txn)
        .await?;
    if sales > 0 || batches > 0 {
        return Err(Error::ProductInUse {
            product_id,
            sales,
            batches,
        });
    }

    RecipeLine::delete_many()
        .filter(recipe_line::Column::ProductId.eq(product_id))
        .exec(&txn)
        .await?;
    Product::delete_by_id(product_id).exec(&txn).await?;

    txn.commit().await?;
    info!("Deleted product {}", product_id);
    Ok(true)
}

/// Atomically adds `delta` to a product's stock and returns the updated product.
///
/// The update is a single `UPDATE products SET current_stock = current_stock + delta`
/// statement. For negative deltas the statement only matches while enough stock is on
/// hand, so stock can never go below zero.
///
/// # Errors
/// Returns `Error::NotFound` for an unknown product, `Error::InsufficientStock`
/// when a decrement exceeds the stock on hand, and `Error::Validation` when an
/// increment would overflow the stock count.
pub async fn adjust_stock_atomic<C>(db: &C, product_id: i64, delta: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    let current = get_product_by_id(db, product_id).await?;
    let Some(new_stock) = current.current_stock.checked_add(delta) else {
        return Err(Error::validation(format!(
            "Stock of product {product_id} would overflow: {} + {delta}",
            current.current_stock
        )));
    };
    if new_stock < 0 {
        return Err(Error::InsufficientStock {
            product_id,
            available: current.current_stock,
            requested: delta.saturating_neg(),
        });
    }

    let mut update = Product::update_many()
        .col_expr(
            product::Column::CurrentStock,
            Expr::col(product::Column::CurrentStock).add(delta),
        )
        .col_expr(product::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(product::Column::Id.eq(product_id));
    if delta < 0 {
        update = update.filter(product::Column::CurrentStock.gte(delta.saturating_neg()));
    }
    let result = update.exec(db).await?;

    if result.rows_affected == 0 {
        // Stock moved between the read and the update
        let latest = get_product_by_id(db, product_id).await?;
        return Err(Error::InsufficientStock {
            product_id,
            available: latest.current_stock,
            requested: delta.saturating_neg(),
        });
    }

    get_product_by_id(db, product_id).await
}
