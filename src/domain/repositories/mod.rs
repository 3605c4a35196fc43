//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are
//! auto-generated via `mockall` for unit tests.

pub mod url_store;

pub use url_store::{StoreError, UrlStore};

#[cfg(test)]
pub use url_store::MockUrlStore;
