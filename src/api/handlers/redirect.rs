//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Click Tracking
///
/// The click is queued for the background worker and counted after the
/// response is produced. A dropped or failed increment never turns a
/// redirect into an error.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 500 Internal Server Error if the stored URL is not a valid header value.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let Some(original_url) = state.url_service.resolve(&code).await? else {
        debug!(short_code = %code, "Short code not found");
        return Err(AppError::not_found(
            "Short URL not found.",
            json!({ "shortCode": code }),
        ));
    };

    let location = HeaderValue::try_from(original_url)?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
