//! Infrastructure layer for external integrations.
//!
//! Implements the storage contracts defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - SQLite connection management and repository implementations

pub mod persistence;
