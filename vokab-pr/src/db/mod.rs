//! Database access for vokab-pr
//!
//! Shared SQLite database in the root folder. This module owns only the
//! recording metadata index table.

pub mod recordings;

pub use recordings::SqliteRecordingIndex;

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Connects to vokab.db in the root folder, creating it if needed
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Use proper SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create vokab-pr tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS pronunciation_recordings (
            word TEXT NOT NULL,
            word_type TEXT NOT NULL,
            file_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (word, word_type)
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (pronunciation_recordings)");

    Ok(())
}
