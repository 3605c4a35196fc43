//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`        - Create a short URL
//! - `GET  /health`         - Health check: database and click queue
//! - `GET  /{code}`         - Short link redirect
//! - `GET  /{code}/stats`   - Click statistics
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::rate_limit::{self, RateLimitSettings};
use crate::api::middleware::tracing;
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `limits` - token bucket parameters applied per client IP
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
///
/// # Errors
///
/// Returns an error if the rate limit settings are invalid.
pub fn app_router(
    state: AppState,
    limits: RateLimitSettings,
    behind_proxy: bool,
) -> Result<NormalizePath<Router>> {
    let public = if behind_proxy {
        api::routes::public_routes().layer(rate_limit::proxied_layer(limits)?)
    } else {
        api::routes::public_routes().layer(rate_limit::layer(limits)?)
    };

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(public)
        .with_state(state)
        .layer(tracing::layer());

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
