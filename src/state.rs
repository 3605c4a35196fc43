//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::UrlService;
use crate::infrastructure::persistence::SqliteUrlStore;
use crate::utils::code_generator::CodeGenerator;

/// URL service wired to the SQLite store.
///
/// The generator is a trait object so the same router can run with the
/// random generator in production and a scripted one in tests.
pub type AppUrlService = UrlService<SqliteUrlStore, dyn CodeGenerator>;

#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<AppUrlService>,
}

impl AppState {
    pub fn new(url_service: Arc<AppUrlService>) -> Self {
        Self { url_service }
    }
}
