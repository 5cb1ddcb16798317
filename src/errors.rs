use thiserror::Error;

/// Every failure the ledger can report.
#[derive(Debug, Error)]
pub enum Error {
    /// An id lookup missed.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up ("product", "sale", ...)
        entity: &'static str,
        /// The id that matched nothing
        id: i64,
    },

    /// A sale asked for more units than are on hand.
    #[error(
        "Insufficient stock for product {product_id}: {available} available, {requested} requested"
    )]
    InsufficientStock {
        /// Product being sold
        product_id: i64,
        /// Units currently on hand
        available: i64,
        /// Units the sale asked for
        requested: i64,
    },

    /// A required field was missing or out of range.
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// A money amount or multiplier was negative, NaN or infinite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected value
        amount: f64,
    },

    /// Per-unit cost was requested for a batch that produced nothing.
    #[error("Production batch {batch_id} has zero quantity")]
    EmptyBatch {
        /// Batch with quantity 0
        batch_id: i64,
    },

    /// A product cannot be deleted while history still points at it.
    #[error(
        "Product {product_id} is referenced by {sales} sale(s) and {batches} production batch(es)"
    )]
    ProductInUse {
        /// Product that was asked to be deleted
        product_id: i64,
        /// Sales referencing it
        sales: u64,
        /// Production batches referencing it
        batches: u64,
    },

    /// Calendar arithmetic fell outside chrono's supported range.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Which date could not be built
        message: String,
    },

    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Config {
        /// What failed to load or parse
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Integer conversion error: {0}")]
    IntConversion(#[from] std::num::TryFromIntError),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
