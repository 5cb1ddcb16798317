//! Dashboard metric cards.
//!
//! Totals cover every recorded sale. The growth card compares the current local
//! month with the one before it.

use crate::{
    config::settings::Settings,
    core::{
        analytics,
        format::{format_change, format_count, format_currency},
        inventory, product, sale,
    },
    entities::product as product_entity,
    errors::Result,
};
use chrono::{NaiveDate, Utc};
use sea_orm::DatabaseConnection;

/// Figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    /// Local date the metrics were computed for
    pub as_of: NaiveDate,
    /// Revenue of all sales
    pub total_revenue: f64,
    /// Number of sales
    pub total_sales_count: usize,
    /// Products at or below the low-stock threshold
    pub low_stock_count: usize,
    /// Number of products
    pub total_products: usize,
    /// Current month's revenue growth over the previous month, in percent
    pub monthly_growth: f64,
    /// The low-stock products, lowest stock first
    pub low_stock: Vec<product_entity::Model>,
}

/// Computes the dashboard for today in the configured local time.
///
/// # Errors
/// Returns an error if the offset setting is invalid or a query fails.
pub async fn dashboard_metrics(
    db: &DatabaseConnection,
    settings: &Settings,
) -> Result<DashboardMetrics> {
    let today = Utc::now().with_timezone(&settings.utc_offset()?).date_naive();
    dashboard_metrics_on(db, settings, today).await
}

/// Computes the dashboard as of a given local date.
///
/// # Errors
/// Returns an error if the offset setting is invalid or a query fails.
pub async fn dashboard_metrics_on(
    db: &DatabaseConnection,
    settings: &Settings,
    today: NaiveDate,
) -> Result<DashboardMetrics> {
    let offset = settings.utc_offset()?;
    let products = product::get_all_products(db).await?;
    let sales = sale::get_all_sales(db).await?;

    let summary = analytics::summarize(&sales);
    let mut low_stock: Vec<product_entity::Model> =
        inventory::low_stock_products(&products, settings.low_stock_threshold)
            .into_iter()
            .cloned()
            .collect();
    low_stock.sort_by_key(|product| (product.current_stock, product.id));

    Ok(DashboardMetrics {
        as_of: today,
        total_revenue: summary.total_revenue,
        total_sales_count: summary.total_sales_count,
        low_stock_count: low_stock.len(),
        total_products: products.len(),
        monthly_growth: analytics::monthly_growth(&sales, today, offset),
        low_stock,
    })
}

/// Renders the metric cards as plain text, one card per line.
#[must_use]
pub fn format_dashboard_summary(metrics: &DashboardMetrics) -> String {
    use std::fmt::Write;

    let mut summary = format!("Dashboard - {}\n", metrics.as_of.format("%B %-d, %Y"));

    let _ = writeln!(
        summary,
        "  Total Revenue: {} ({} vs last month)",
        format_currency(metrics.total_revenue),
        format_change(metrics.monthly_growth)
    );
    let _ = writeln!(
        summary,
        "  Total Sales: {}",
        format_count(i64::try_from(metrics.total_sales_count).unwrap_or(i64::MAX))
    );
    let _ = writeln!(
        summary,
        "  Low Stock Items: {} of {} products",
        metrics.low_stock_count, metrics.total_products
    );

    for product in &metrics.low_stock {
        let _ = writeln!(summary, "    {} - {} left", product.name, product.current_stock);
    }

    summary
}
