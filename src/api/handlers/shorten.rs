//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::ApiResponse;
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::{MAX_URL_LENGTH, UrlValidationError, validate_http_url};

/// Creates a short URL, or returns the existing one for a known URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a/b" }
/// ```
///
/// # Response
///
/// `201 Created` for a new mapping, `200 OK` when the URL was already shortened:
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "originalUrl": "https://example.com/a/b",
///     "shortUrl": "http://localhost:3000/Ab3xQ9z",
///     "shortCode": "Ab3xQ9z"
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the body is not JSON, or the URL is missing,
/// malformed, too long or not HTTP(S).
/// Returns 503 Service Unavailable if no unique code could be allocated.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ShortenResponse>>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let Some(url) = payload.url else {
        return Err(AppError::bad_request("URL is required.", json!({})));
    };

    validate_http_url(&url).map_err(|e| match e {
        UrlValidationError::TooLong => AppError::bad_request(
            "URL is too long.",
            json!({ "maxLength": MAX_URL_LENGTH }),
        ),
        _ => AppError::bad_request(
            "Invalid URL. Only http and https protocols are allowed.",
            json!({ "reason": e.to_string() }),
        ),
    })?;

    let outcome = state.url_service.shorten(&url).await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::ok(outcome.into()))))
}
