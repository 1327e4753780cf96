//! Database connection and pool management.
//!
//! The pool is built once by the binary and handed to every repository as
//! an `Arc<DatabaseConnection>`. Each statement acquires a pooled connection
//! and returns it when the statement completes, on success or error.

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::time::Duration;

use crate::config::AppConfig;

/// Errors that can occur during database setup.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {source}")]
    ConnectionFailed {
        #[from]
        source: sea_orm::DbErr,
    },
    #[error("Invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Initializes the connection pool described by the configuration.
///
/// A single connection attempt is made; failures are returned to the caller
/// rather than retried.
///
/// # Examples
///
/// ```no_run
/// use campaigns::{config::AppConfig, db::init_pool};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::default();
///     let db = init_pool(&config).await?;
///     // Hand `db` to the repositories...
///     Ok(())
/// }
/// ```
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    let url = cfg
        .database
        .database_url()
        .map_err(|err| DatabaseError::InvalidConfiguration {
            message: err.to_string(),
        })?;

    if url.is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "Database URL cannot be empty".to_string(),
        }
        .into());
    }

    let pool = &cfg.database.pool;
    // Every connection to `sqlite::memory:` opens its own empty database.
    let max_connections = if url.contains(":memory:") { 1 } else { pool.size };

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(max_connections)
        .acquire_timeout(Duration::from_millis(pool.acquire_timeout_ms))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    // Recycling an in-memory SQLite connection would drop the database.
    if cfg.database.driver != "sqlite" {
        opt.idle_timeout(Duration::from_secs(600)) // 10 minutes
            .max_lifetime(Duration::from_secs(1800)); // 30 minutes
    } else {
        opt.min_connections(1);
    }

    let conn = Database::connect(opt)
        .await
        .map_err(|source| DatabaseError::ConnectionFailed { source })?;

    tracing::info!(
        pool = %pool.name,
        size = pool.size,
        driver = %cfg.database.driver,
        "Connected to database"
    );

    Ok(conn)
}

/// Applies all pending schema migrations.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("Failed to apply database migrations")?;
    Ok(())
}

/// Health check for the database connection.
///
/// Verifies that a pooled connection can be acquired and a trivial query
/// executed.
pub async fn health_check(db: &DatabaseConnection) -> Result<()> {
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());

    db.query_one(stmt)
        .await
        .context("Database health check failed")?;

    Ok(())
}
