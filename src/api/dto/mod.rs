//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Success bodies are wrapped in [`ApiResponse`].

pub mod health;
pub mod response;
pub mod shorten;
pub mod stats;

pub use response::ApiResponse;
