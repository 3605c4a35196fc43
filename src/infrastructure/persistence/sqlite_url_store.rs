//! SQLite implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{UrlRecord, UrlStats};
use crate::domain::repositories::{StoreError, UrlStore};
use crate::utils::db_error::is_unique_violation;

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    original_url: String,
    short_code: String,
    clicks: i64,
    created_at: DateTime<Utc>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        UrlRecord::new(
            row.id,
            row.original_url,
            row.short_code,
            row.clicks,
            row.created_at,
        )
    }
}

/// SQLite repository for short code mappings.
///
/// Every operation is a single statement, so SQLite's per-statement atomicity
/// gives each call all-or-nothing semantics and WAL gives readers a consistent
/// snapshot.
pub struct SqliteUrlStore {
    pool: Arc<SqlitePool>,
}

impl SqliteUrlStore {
    /// Creates a new store over a connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlStore for SqliteUrlStore {
    async fn insert(&self, original_url: &str, short_code: &str) -> Result<UrlRecord, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            INSERT INTO urls (original_url, short_code, clicks, created_at)
            VALUES (?1, ?2, 0, ?3)
            RETURNING id, original_url, short_code, clicks, created_at
            "#,
        )
        .bind(original_url)
        .bind(short_code)
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateCode(short_code.to_string())
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_code, clicks, created_at
            FROM urls
            WHERE short_code = ?1
            "#,
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, StoreError> {
        let row = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, original_url, short_code, clicks, created_at
            FROM urls
            WHERE original_url = ?1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<bool, StoreError> {
        // The engine evaluates clicks + 1 under its write lock; never read-then-write here.
        let result = sqlx::query("UPDATE urls SET clicks = clicks + 1 WHERE short_code = ?1")
            .bind(short_code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_stats(&self, short_code: &str) -> Result<Option<UrlStats>, StoreError> {
        let record = self.find_by_short_code(short_code).await?;

        Ok(record.map(|r| r.stats()))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;

        Ok(())
    }
}
