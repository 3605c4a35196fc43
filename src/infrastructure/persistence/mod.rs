//! SQLite persistence.
//!
//! - [`database`] - Pool construction and schema migrations
//! - [`SqliteUrlStore`] - URL mapping storage and atomic click counting

pub mod database;
pub mod sqlite_url_store;

pub use sqlite_url_store::SqliteUrlStore;
