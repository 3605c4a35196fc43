//! Utility functions for code generation, URL validation and error classification.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validator`] - HTTP(S) URL validation
//! - [`db_error`] - SQLite error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
