//! Success envelope shared by JSON endpoints.

use serde::Serialize;

/// `{"success": true, "data": ...}` wrapper.
///
/// Errors use the matching `{"success": false, "error": ...}` body produced by
/// [`crate::error::AppError`].
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
