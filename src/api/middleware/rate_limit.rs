//! Per-client rate limiting using the token bucket algorithm.

use anyhow::{Result, anyhow};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    /// Requests a client may send back to back.
    pub burst: u32,
    /// Milliseconds after which one more request is allowed.
    pub replenish_ms: u64,
}

impl Default for RateLimitSettings {
    /// 100 requests per 15 minutes.
    fn default() -> Self {
        Self {
            burst: 100,
            replenish_ms: 9_000,
        }
    }
}

/// Creates a rate limiter keyed on the peer socket address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
/// The router must be served with `into_make_service_with_connect_info`.
///
/// # Errors
///
/// Returns an error if `burst` or `replenish_ms` is zero.
pub fn layer(
    settings: RateLimitSettings,
) -> Result<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(settings.replenish_ms)
        .burst_size(settings.burst)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit settings: {settings:?}"))?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Creates a rate limiter keyed on `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
/// falling back to the peer address.
///
/// Use only behind a trusted reverse proxy; otherwise clients can pick their own key.
///
/// # Errors
///
/// Returns an error if `burst` or `replenish_ms` is zero.
pub fn proxied_layer(
    settings: RateLimitSettings,
) -> Result<GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_millisecond(settings.replenish_ms)
        .burst_size(settings.burst)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit settings: {settings:?}"))?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}
