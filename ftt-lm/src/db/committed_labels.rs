//! Committed label persistence

use crate::models::{DedupKey, ParsedLabel};
use async_trait::async_trait;
use ftt_common::{Error, Result};
use sqlx::{Pool, Sqlite};

/// Receives labels the user committed
///
/// The core never waits on or rolls back after a `save`; an error is only
/// logged.
#[async_trait]
pub trait LabelSink: Send + Sync {
    async fn save(&self, key: &DedupKey, label: &ParsedLabel) -> Result<()>;

    /// Keys committed in earlier sessions
    async fn load_committed_keys(&self) -> Result<Vec<DedupKey>>;
}

pub struct SqliteLabelSink {
    db: Pool<Sqlite>,
}

impl SqliteLabelSink {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LabelSink for SqliteLabelSink {
    async fn save(&self, key: &DedupKey, label: &ParsedLabel) -> Result<()> {
        let dates = serde_json::to_string(&label.dates)
            .map_err(|e| Error::Internal(format!("Serialize dates failed: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO committed_labels
                (dedup_key, label_id, product_name, batch_no, employee_name, label_type, dates, committed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(dedup_key) DO NOTHING
            "#,
        )
        .bind(key.as_str())
        .bind(&label.label_id)
        .bind(&label.product_name)
        .bind(&label.batch_no)
        .bind(&label.employee_name)
        .bind(&label.label_type)
        .bind(dates)
        .bind(ftt_common::time::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        tracing::debug!(key = %key, "Committed label persisted");
        Ok(())
    }

    async fn load_committed_keys(&self) -> Result<Vec<DedupKey>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT dedup_key FROM committed_labels ORDER BY committed_at")
                .fetch_all(&self.db)
                .await?;

        Ok(rows.into_iter().map(|(key,)| DedupKey::new(key)).collect())
    }
}
