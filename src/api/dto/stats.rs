//! DTOs for link statistics.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::UrlStats;

/// Click statistics for a single short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UrlStats> for StatsResponse {
    fn from(stats: UrlStats) -> Self {
        Self {
            short_code: stats.short_code,
            original_url: stats.original_url,
            clicks: stats.clicks,
            created_at: stats.created_at,
        }
    }
}
