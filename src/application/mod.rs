//! Application layer services implementing business logic.
//!
//! Services orchestrate domain operations by coordinating the code generator
//! and the store, and expose a narrow API to HTTP handlers and the CLI.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Shortening, resolution and stats

pub mod services;
