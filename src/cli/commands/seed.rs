use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::database::{seed, DatabaseManager};

/// Connect, create indexes and seed empty collections. Any failure is fatal.
pub async fn handle(config: AppConfig) -> anyhow::Result<()> {
    let db = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to document store")?;

    let result = seed::initialize(&db.with_timeout(config.database.startup_timeout())).await;
    db.close().await;

    let report = result.context("seeding failed")?;
    info!(
        "Seed complete: {} categories, {} products, {} users inserted",
        report.categories, report.products, report.users
    );
    Ok(())
}
