//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public short link routes.
///
/// # Endpoints
///
/// - `POST /shorten`        - Create (or reuse) a short URL
/// - `GET  /{code}`         - 302 redirect to the original URL
/// - `GET  /{code}/stats`   - Click statistics for a short URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/{code}", get(redirect_handler))
        .route("/{code}/stats", get(stats_handler))
}
