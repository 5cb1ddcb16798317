//! Framework-agnostic ledger logic.
//!
//! Store modules (`product`, `component`, `sale`, `production`, `notes`) talk to the
//! database through any `sea_orm::ConnectionTrait`, so the same functions run against
//! SQLite, another sea-orm backend, a transaction, or the mock database. The
//! calculation modules (`costing`, `analytics`, `format`, `inventory`) are pure.

use crate::errors::Result;
use sea_orm::{ConnectionTrait, EntityTrait, QuerySelect, sea_query::Expr};

/// Sales aggregation: summaries, calendar grouping, rankings and growth
pub mod analytics;
/// Component stock store
pub mod component;
/// Recipe cost calculator
pub mod costing;
/// Dashboard metric cards
pub mod dashboard;
/// Currency, percentage and count formatting
pub mod format;
/// Stock status, low-stock lists and search filters
pub mod inventory;
/// Notes pad singleton
pub mod notes;
/// Product and recipe store
pub mod product;
/// Production batch store and aggregator
pub mod production;
/// Sale store and sale recording
pub mod sale;

/// Returns the id the next record of `E` receives: the current maximum plus one,
/// or 1 for an empty table.
pub(crate) async fn next_id<E, C>(db: &C, id_column: E::Column) -> Result<i64>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let max_id: Option<Option<i64>> = E::find()
        .select_only()
        .column_as(Expr::col(id_column).max(), "max_id")
        .into_tuple()
        .one(db)
        .await?;

    Ok(max_id.flatten().unwrap_or(0) + 1)
}

/// Rejects money values that are negative, NaN or infinite.
pub(crate) fn ensure_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(crate::errors::Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Rejects names that are empty once trimmed, returning the trimmed name.
pub(crate) fn ensure_name(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(crate::errors::Error::validation(format!(
            "{field} cannot be empty"
        )));
    }
    Ok(trimmed.to_string())
}
