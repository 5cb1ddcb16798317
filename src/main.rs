use dotenvy::dotenv;
use flavor_junkie::{
    config::{
        catalog,
        database::{self, DEFAULT_DATABASE_URL},
        settings::Settings,
    },
    core::dashboard,
    errors::Result,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Read settings
    let settings = Settings::from_env()
        .inspect_err(|e| error!("Invalid settings: {}", e))?;
    info!(
        "Low-stock threshold {}, UTC offset {} minutes",
        settings.low_stock_threshold, settings.utc_offset_minutes
    );

    // 4. Connect and create tables
    let database_url = database::get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed the catalog into an empty store
    if Path::new(&settings.catalog_path).exists() {
        let catalog = catalog::load_catalog(&settings.catalog_path)?;
        catalog::seed_catalog(&db, &catalog)
            .await
            .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
    } else {
        warn!("No catalog at {}, skipping seed.", settings.catalog_path);
    }

    // 6. Report
    let metrics = dashboard::dashboard_metrics(&db, &settings).await?;
    info!("\n{}", dashboard::format_dashboard_summary(&metrics));
    for product in &metrics.low_stock {
        warn!(
            "Low stock: {} has {} units left",
            product.name, product.current_stock
        );
    }

    Ok(())
}
