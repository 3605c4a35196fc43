//! Click event model for asynchronous click counting.

/// A successful redirect waiting to be counted.
///
/// Redirect handling enqueues one event per hit; the background worker turns
/// it into a single atomic `clicks = clicks + 1` on the store. Keeping the
/// increment off the request path means a slow or failing store never delays
/// or breaks the redirect itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub short_code: String,
}

impl ClickEvent {
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
        }
    }
}
