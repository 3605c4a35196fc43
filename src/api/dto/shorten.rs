//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenOutcome;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The original URL to shorten.
    ///
    /// Only the general URL shape is checked here; scheme, length and
    /// character rules are enforced by `validate_http_url`.
    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,
}

/// A created or reused short link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub original_url: String,
    pub short_url: String,
    pub short_code: String,
}

impl From<ShortenOutcome> for ShortenResponse {
    fn from(outcome: ShortenOutcome) -> Self {
        Self {
            original_url: outcome.original_url,
            short_url: outcome.short_url,
            short_code: outcome.short_code,
        }
    }
}
