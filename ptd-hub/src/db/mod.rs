//! Database access layer for ptd-hub
//!
//! The two collections are stored document-style: one row per record, the
//! full JSON document in a single column, keyed by the record id. Reads go
//! through the sanitizer, so row contents are never trusted.

use std::path::Path;

use ptd_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

/// Initialize database connection and create collections if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL allows concurrent readers while one writer commits
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    // Idempotent - safe to call on every startup
    create_programs_table(&pool).await?;
    create_history_table(&pool).await?;

    Ok(pool)
}

async fn create_programs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS programs (
            id TEXT PRIMARY KEY,
            record TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn create_history_table(pool: &SqlitePool) -> Result<()> {
    // data_hora is duplicated out of the record so the newest-first read
    // can be ordered in SQL
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS history (
            id TEXT PRIMARY KEY,
            record TEXT NOT NULL,
            data_hora TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;
    Ok(())
}
