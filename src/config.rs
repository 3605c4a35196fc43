//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Database
//!
//! ```bash
//! export DATABASE_URL="sqlite://./data/urls.db"
//! # or just the file path
//! export DB_PATH="./data/urls.db"
//! ```
//!
//! If `DATABASE_URL` is not set, it is built from `DB_PATH`
//! (default: `./data/urls.db`).
//!
//! ## Optional Variables
//!
//! - `BASE_URL` - Public origin used to build short URLs (default: `http://localhost:3000`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:$PORT`, `PORT` default: 3000)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CODE_LENGTH` - Generated short code length (default: 7, range: 4-32)
//! - `SHORTEN_MAX_ATTEMPTS` - Collision retries before failing (default: 5)
//! - `CLICK_QUEUE_CAPACITY` - Click event buffer size (default: 10000, min: 100)
//! - `CLICK_WORKER_CONCURRENCY` - Concurrent click increments (default: 4)
//! - `DB_MAX_CONNECTIONS`, `DB_BUSY_TIMEOUT_MS`, `DB_ACQUIRE_TIMEOUT` - Pool tuning
//! - `BEHIND_PROXY` - Trust `X-Forwarded-For` / `X-Real-IP` for rate limiting
//! - `RATE_LIMIT_BURST`, `RATE_LIMIT_REPLENISH_MS` - Per-IP rate limit

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::infrastructure::persistence::database::PoolSettings;

const DEFAULT_DB_PATH: &str = "./data/urls.db";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub base_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Length of generated short codes.
    pub code_length: usize,
    /// Generate-and-insert attempts per shorten call before reporting exhaustion.
    pub shorten_max_attempts: usize,
    pub click_queue_capacity: usize,
    /// Maximum number of click increments applied concurrently by the background worker.
    pub click_worker_concurrency: usize,
    /// When true, rate limiting reads client IP from X-Forwarded-For / X-Real-IP headers.
    /// Enable only when the service is behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// Requests a client may burst before being throttled.
    pub rate_limit_burst: u32,
    /// Interval in milliseconds after which one more request is allowed.
    pub rate_limit_replenish_ms: u64,

    // ── SqlitePool settings ─────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// How long a writer waits for SQLite's write lock in milliseconds
    /// (`DB_BUSY_TIMEOUT_MS`, default: 5000).
    pub db_busy_timeout_ms: u64,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_ACQUIRE_TIMEOUT`, default: 30).
    pub db_acquire_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        let database_url = Self::load_database_url();
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
        let listen_addr = Self::load_listen_addr();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        Ok(Self {
            database_url,
            base_url,
            listen_addr,
            log_level,
            log_format,
            code_length: parse_env("CODE_LENGTH", 7),
            shorten_max_attempts: parse_env("SHORTEN_MAX_ATTEMPTS", 5),
            click_queue_capacity: parse_env("CLICK_QUEUE_CAPACITY", 10_000),
            click_worker_concurrency: parse_env("CLICK_WORKER_CONCURRENCY", 4),
            behind_proxy,
            rate_limit_burst: parse_env("RATE_LIMIT_BURST", 100),
            rate_limit_replenish_ms: parse_env("RATE_LIMIT_REPLENISH_MS", 9_000),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 5),
            db_busy_timeout_ms: parse_env("DB_BUSY_TIMEOUT_MS", 5_000),
            db_acquire_timeout: parse_env("DB_ACQUIRE_TIMEOUT", 30),
        })
    }

    /// Loads database URL with fallback to a file path.
    ///
    /// Priority:
    /// 1. `DATABASE_URL` environment variable
    /// 2. `sqlite://` + `DB_PATH`
    /// 3. `sqlite://./data/urls.db`
    fn load_database_url() -> String {
        if let Ok(url) = env::var("DATABASE_URL") {
            return url;
        }

        let path = env::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.to_string());
        format!("sqlite://{}", path)
    }

    /// Loads the bind address, preferring `LISTEN` over `PORT`.
    fn load_listen_addr() -> String {
        if let Ok(addr) = env::var("LISTEN") {
            return addr;
        }

        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        format!("0.0.0.0:{}", port)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        let base = url::Url::parse(&self.base_url)
            .with_context(|| format!("BASE_URL is not a valid URL: '{}'", self.base_url))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!("BASE_URL must use http or https, got '{}'", self.base_url);
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !(4..=32).contains(&self.code_length) {
            anyhow::bail!(
                "CODE_LENGTH must be between 4 and 32, got {}",
                self.code_length
            );
        }

        if self.shorten_max_attempts == 0 || self.shorten_max_attempts > 100 {
            anyhow::bail!(
                "SHORTEN_MAX_ATTEMPTS must be between 1 and 100, got {}",
                self.shorten_max_attempts
            );
        }

        if self.click_queue_capacity < 100 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY must be at least 100, got {}",
                self.click_queue_capacity
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if self.click_worker_concurrency == 0 || self.click_worker_concurrency > 256 {
            anyhow::bail!(
                "CLICK_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.click_worker_concurrency
            );
        }

        if self.rate_limit_burst == 0 {
            anyhow::bail!("RATE_LIMIT_BURST must be at least 1");
        }
        if self.rate_limit_replenish_ms == 0 {
            anyhow::bail!("RATE_LIMIT_REPLENISH_MS must be greater than 0");
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_busy_timeout_ms == 0 {
            anyhow::bail!("DB_BUSY_TIMEOUT_MS must be greater than 0");
        }
        if self.db_acquire_timeout == 0 {
            anyhow::bail!("DB_ACQUIRE_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Pool settings derived from the `DB_*` variables.
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.db_max_connections,
            busy_timeout: Duration::from_millis(self.db_busy_timeout_ms),
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Database: {}", mask_connection_string(&self.database_url));
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Short code length: {}", self.code_length);
        tracing::info!("  Click queue capacity: {}", self.click_queue_capacity);
        tracing::info!(
            "  Rate limit: burst {}, +1 every {}ms{}",
            self.rate_limit_burst,
            self.rate_limit_replenish_ms,
            if self.behind_proxy { " (behind proxy)" } else { "" }
        );
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Replaces the password in a connection string with `***` for logging.
///
/// Strings without credentials, or that do not parse as URLs, are returned unchanged.
fn mask_connection_string(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("***")).is_ok() {
                parsed.to_string()
            } else {
                raw.to_string()
            }
        }
        _ => raw.to_string(),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
