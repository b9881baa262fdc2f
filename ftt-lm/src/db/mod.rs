//! Database access for ftt-lm
//!
//! SQLite holds the labels a user committed, so a restarted service can keep
//! excluding them.

pub mod committed_labels;

pub use committed_labels::{LabelSink, SqliteLabelSink};

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create ftt-lm tables if they don't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS committed_labels (
            dedup_key TEXT PRIMARY KEY,
            label_id TEXT NOT NULL,
            product_name TEXT NOT NULL,
            batch_no TEXT NOT NULL,
            employee_name TEXT NOT NULL,
            label_type TEXT NOT NULL,
            dates TEXT NOT NULL,
            committed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (committed_labels)");

    Ok(())
}
