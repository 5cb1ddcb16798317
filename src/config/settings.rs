//! Runtime settings loaded from environment variables.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration. Values are read after `.env` has been loaded by the binary.

use crate::errors::{Error, Result};
use chrono::FixedOffset;
use std::env;

/// Products at or below this stock count show up as low stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 10;

/// Default location of the seed catalog.
pub const DEFAULT_CATALOG_PATH: &str = "config.toml";

/// Settings that shape reporting rather than storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Stock level at or below which a product counts as low stock
    pub low_stock_threshold: i64,
    /// Offset of the business's local time from UTC, in minutes.
    /// Calendar-day grouping of sales uses this offset.
    pub utc_offset_minutes: i32,
    /// Path of the TOML seed catalog
    pub catalog_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            utc_offset_minutes: 0,
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Reads `LOW_STOCK_THRESHOLD`, `UTC_OFFSET_MINUTES` and `CATALOG_PATH`.
    ///
    /// # Errors
    /// Returns `Error::Config` when a variable is set but cannot be parsed, or when
    /// the offset is outside ±24 hours.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let low_stock_threshold = match env::var("LOW_STOCK_THRESHOLD") {
            Ok(raw) => parse_var("LOW_STOCK_THRESHOLD", &raw)?,
            Err(_) => defaults.low_stock_threshold,
        };
        if low_stock_threshold < 0 {
            return Err(Error::Config {
                message: format!(
                    "LOW_STOCK_THRESHOLD must not be negative, got {low_stock_threshold}"
                ),
            });
        }

        let utc_offset_minutes = match env::var("UTC_OFFSET_MINUTES") {
            Ok(raw) => parse_var("UTC_OFFSET_MINUTES", &raw)?,
            Err(_) => defaults.utc_offset_minutes,
        };

        let settings = Self {
            low_stock_threshold,
            utc_offset_minutes,
            catalog_path: env::var("CATALOG_PATH").unwrap_or(defaults.catalog_path),
        };
        // Reject bad offsets up front instead of at first use
        settings.utc_offset()?;
        Ok(settings)
    }

    /// The configured local offset as a chrono `FixedOffset`.
    ///
    /// # Errors
    /// Returns `Error::Config` when the offset is outside ±24 hours.
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| Error::Config {
                message: format!(
                    "UTC_OFFSET_MINUTES out of range: {}",
                    self.utc_offset_minutes
                ),
            })
    }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| Error::Config {
        message: format!("Failed to parse {name}={raw:?}: {e}"),
    })
}
