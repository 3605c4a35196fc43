//! Original URL validation.
//!
//! The store keeps URLs verbatim, so validation only decides whether a URL
//! is acceptable. It never rewrites it.

use url::Url;

/// Longest original URL accepted by the API.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur while validating an original URL.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only http and https protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must not be longer than {MAX_URL_LENGTH} characters")]
    TooLong,
}

/// Validates that a string is a well-formed HTTP or HTTPS URL.
///
/// Rejects `javascript:`, `data:`, `file:` and every other non-web scheme so a
/// short link can never be turned into a script injection vector.
///
/// # Errors
///
/// Returns [`UrlValidationError::TooLong`] above [`MAX_URL_LENGTH`] characters.
/// Returns [`UrlValidationError::InvalidFormat`] for malformed URLs, including
/// input with control characters or surrounding whitespace. The URL parser
/// would silently drop or escape those, leaving a stored value that differs
/// from what was validated and cannot be sent back as a `Location` header.
/// Returns [`UrlValidationError::UnsupportedProtocol`] for non-HTTP(S) schemes.
pub fn validate_http_url(input: &str) -> Result<(), UrlValidationError> {
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    if input.chars().any(char::is_control) {
        return Err(UrlValidationError::InvalidFormat(
            "contains control characters".to_string(),
        ));
    }

    if input.trim() != input {
        return Err(UrlValidationError::InvalidFormat(
            "leading or trailing whitespace".to_string(),
        ));
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::InvalidFormat("missing host".to_string()));
    }

    Ok(())
}
