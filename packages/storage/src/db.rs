// ABOUTME: Database connection management
// ABOUTME: Pool construction, SQLite pragmas, and schema migrations

use std::path::PathBuf;
use std::time::Duration;

use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};

/// Connect to the database at the given path (default: ~/.huddle/huddle.db),
/// apply pragmas, and run pending migrations.
pub async fn connect(database_path: Option<PathBuf>) -> StorageResult<SqlitePool> {
    let database_path = database_path.unwrap_or_else(huddle_core::default_db_path);

    // Ensure parent directory exists
    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
    }

    let database_url = format!("sqlite:{}?mode=rwc", database_path.display());

    debug!("Connecting to database: {}", database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&database_url)
        .await
        .map_err(StorageError::Sqlx)?;

    for pragma in [
        "PRAGMA journal_mode = WAL",
        "PRAGMA foreign_keys = ON",
        "PRAGMA synchronous = NORMAL",
    ] {
        sqlx::query(pragma)
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;
    }

    info!("Database connection established");

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Connect to a private in-memory database. Used by tests; a single
/// connection keeps the database alive for the pool's lifetime.
pub async fn connect_memory() -> StorageResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .map_err(StorageError::Sqlx)?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .map_err(StorageError::Sqlx)?;

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)?;

    debug!("Database migrations completed");
    Ok(())
}
