//! Repository trait for short code mappings.

use crate::domain::entities::{UrlRecord, UrlStats};
use async_trait::async_trait;

/// Errors returned by [`UrlStore`] implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The short code is already taken. Raised by the storage engine's
    /// unique constraint, never by a prior existence check.
    #[error("short code '{0}' already exists")]
    DuplicateCode(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable storage for [`UrlRecord`]s.
///
/// The store is the only shared mutable resource of the service, so every
/// concurrency guarantee lives here:
///
/// - short code uniqueness is a storage-level constraint
/// - click increments are a single read-modify-write evaluated by the engine
/// - readers never observe a partially applied mutation
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteUrlStore`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Inserts a new mapping with zero clicks.
    ///
    /// Duplicate `original_url` values are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateCode`] if `short_code` is already taken.
    /// Returns [`StoreError::Database`] on storage failures.
    async fn insert(&self, original_url: &str, short_code: &str) -> Result<UrlRecord, StoreError>;

    /// Finds a record by its short code.
    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<UrlRecord>, StoreError>;

    /// Finds a record for the given original URL.
    ///
    /// When several records share the URL, the earliest one (lowest id) wins.
    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, StoreError>;

    /// Atomically increments the click counter by exactly one.
    ///
    /// Returns `Ok(false)` without mutating anything if the code does not exist.
    async fn increment_clicks(&self, short_code: &str) -> Result<bool, StoreError>;

    /// Returns click statistics for a short code.
    async fn get_stats(&self, short_code: &str) -> Result<Option<UrlStats>, StoreError>;

    /// Checks that the storage engine answers queries.
    async fn ping(&self) -> Result<(), StoreError>;
}
