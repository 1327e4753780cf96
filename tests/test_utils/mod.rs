//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations for testing purposes.

use anyhow::Result;
use campaigns::repositories::NewCampaign;
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// # Returns
///
/// Returns a Result containing the database connection
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    // Create in-memory SQLite database
    let db = Database::connect("sqlite::memory:").await?;

    // Run all migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Sets up an in-memory SQLite database with all migrations applied and returns an Arc.
#[allow(dead_code)]
pub async fn setup_test_db_arc() -> Result<Arc<DatabaseConnection>> {
    let db = setup_test_db().await?;
    Ok(Arc::new(db))
}

/// Parses a `YYYY-MM-DD` literal.
#[allow(dead_code)]
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

/// A valid campaign input with the given name and no dates.
#[allow(dead_code)]
pub fn new_campaign(name: &str) -> NewCampaign {
    NewCampaign {
        name: name.to_string(),
        start_date: None,
        end_date: None,
        budget_cents: 0,
    }
}

/// A migrated SQLite database file inside `dir`, served by a pool of
/// `pool_size` connections so callers can contend for it.
#[allow(dead_code)]
pub async fn setup_file_db_arc(
    dir: &tempfile::TempDir,
    pool_size: u32,
) -> Result<Arc<DatabaseConnection>> {
    let mut config = campaigns::config::AppConfig::default();
    config.database.driver = "sqlite".to_string();
    config.database.pool.size = pool_size;
    config.database.connection.config.database =
        dir.path().join("campaigns.db").to_string_lossy().to_string();

    let db = campaigns::db::init_pool(&config).await?;
    campaigns::db::run_migrations(&db).await?;
    Ok(Arc::new(db))
}
