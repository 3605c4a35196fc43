//! URL record entity representing a persisted short code mapping.

use chrono::{DateTime, Utc};

/// A persisted mapping between a short code and its original URL.
///
/// Records are immutable once created except for `clicks`, which only the
/// store's atomic increment ever touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        clicks: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            clicks,
            created_at,
        }
    }

    /// Returns the public statistics view of this record.
    pub fn stats(&self) -> UrlStats {
        UrlStats {
            short_code: self.short_code.clone(),
            original_url: self.original_url.clone(),
            clicks: self.clicks,
            created_at: self.created_at,
        }
    }
}

/// Click statistics for a single short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStats {
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}
