//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;

use crate::api::dto::ApiResponse;
use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click statistics for a short link.
///
/// # Endpoint
///
/// `GET /{code}/stats`
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "shortCode": "Ab3xQ9z",
///     "originalUrl": "https://example.com/a/b",
///     "clicks": 1,
///     "createdAt": "2026-01-01T12:00:00Z"
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<StatsResponse>>, AppError> {
    let stats = state.url_service.stats(&code).await?.ok_or_else(|| {
        AppError::not_found("Short URL not found.", json!({ "shortCode": code }))
    })?;

    Ok(Json(ApiResponse::ok(stats.into())))
}
