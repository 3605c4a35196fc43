//! Core domain entities.
//!
//! - [`UrlRecord`] - The sole persisted entity: a short code mapping with its click counter
//! - [`UrlStats`] - Read-only statistics view returned by the stats endpoint

pub mod url_record;

pub use url_record::{UrlRecord, UrlStats};
