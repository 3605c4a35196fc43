//! # tinylink
//!
//! A small URL shortening service built with Axum and SQLite.
//!
//! ## Architecture
//!
//! The crate is split into layers:
//!
//! - **Domain Layer** ([`domain`]) - Core entities, the URL store contract and click processing
//! - **Application Layer** ([`application`]) - The mapping service: shorten, resolve, stats
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite persistence
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Random 7-character codes over a 64-symbol URL-safe alphabet
//! - Idempotent shortening: a known URL returns its existing code
//! - Collision-safe code assignment backed by a unique constraint
//! - Asynchronous, lossless click counting with retry logic
//! - Rate limiting and observability
//!
//! ## Quick Start
//!
//! ```bash
//! export DB_PATH="./data/urls.db"          # Optional
//! export BASE_URL="https://sho.rt"         # Optional
//!
//! # Start the service (migrations run on startup)
//! cargo run
//!
//! curl -X POST localhost:3000/shorten -H 'content-type: application/json' \
//!      -d '{"url":"https://example.com/a"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{ShortenOutcome, ShortenStatus, UrlService};
    pub use crate::domain::entities::{UrlRecord, UrlStats};
    pub use crate::domain::repositories::{StoreError, UrlStore};
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::SqliteUrlStore;
    pub use crate::state::AppState;
    pub use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
}
