//! Short link creation, resolution and statistics service.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{UrlRecord, UrlStats};
use crate::domain::repositories::{StoreError, UrlStore};
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, is_reserved, is_valid_code};

/// Default cap on generate-and-insert attempts per shorten call.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Whether [`UrlService::shorten`] created a new mapping or reused one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortenStatus {
    Created,
    Existing,
}

/// Result of a shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub status: ShortenStatus,
}

impl ShortenOutcome {
    pub fn is_created(&self) -> bool {
        self.status == ShortenStatus::Created
    }
}

/// Service mapping original URLs to short codes and back.
///
/// The service holds no locks: every store call is an independent atomic
/// operation, and all uniqueness and counting guarantees are delegated to
/// the injected [`UrlStore`].
pub struct UrlService<S: UrlStore, G: CodeGenerator + ?Sized> {
    store: Arc<S>,
    generator: Arc<G>,
    click_sender: mpsc::Sender<ClickEvent>,
    base_url: String,
    max_attempts: usize,
}

impl<S: UrlStore, G: CodeGenerator + ?Sized> UrlService<S, G> {
    /// Creates a new URL service.
    ///
    /// `base_url` is the public origin prefixed to codes when building short URLs.
    pub fn new(
        store: Arc<S>,
        generator: Arc<G>,
        click_sender: mpsc::Sender<ClickEvent>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            generator,
            click_sender,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Overrides the number of generate-and-insert attempts before giving up.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Shortens a URL, reusing an existing mapping when there is one.
    ///
    /// The URL must already be validated by the caller; it is stored verbatim.
    ///
    /// # Deduplication
    ///
    /// A URL that is already known returns its existing code with
    /// [`ShortenStatus::Existing`]. The lookup and the insert are separate
    /// store calls, so two concurrent calls for the same unseen URL can both
    /// create a mapping. Code uniqueness is the hard guarantee; URL
    /// deduplication is best-effort.
    ///
    /// # Code Generation
    ///
    /// Each attempt inserts a fresh candidate and relies on the store's unique
    /// constraint to reject collisions. Collisions and reserved candidates are
    /// discarded and retried up to the configured attempt limit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeSpaceExhausted`] when every attempt collided.
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn shorten(&self, original_url: &str) -> Result<ShortenOutcome, AppError> {
        if let Some(existing) = self.store.find_by_original_url(original_url).await? {
            debug!(short_code = %existing.short_code, "URL already shortened");
            return Ok(self.outcome(existing, ShortenStatus::Existing));
        }

        for attempt in 1..=self.max_attempts {
            let candidate = self.generator.generate();

            if is_reserved(&candidate) {
                debug!(attempt, candidate = %candidate, "Generated reserved code, retrying");
                continue;
            }

            match self.store.insert(original_url, &candidate).await {
                Ok(record) => {
                    metrics::counter!("tinylink_links_created_total").increment(1);
                    info!(short_code = %record.short_code, attempt, "Short link created");
                    return Ok(self.outcome(record, ShortenStatus::Created));
                }
                Err(StoreError::DuplicateCode(code)) => {
                    metrics::counter!("tinylink_code_collisions_total").increment(1);
                    warn!(attempt, short_code = %code, "Short code collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        error!(
            attempts = self.max_attempts,
            "Could not allocate a unique short code"
        );

        Err(AppError::code_space_exhausted(
            "Failed to generate a unique short code",
            json!({ "attempts": self.max_attempts }),
        ))
    }

    /// Resolves a short code to its original URL and counts the visit.
    ///
    /// Returns `Ok(None)` for unknown codes, with no side effects.
    ///
    /// The click is handed to the background worker without waiting; a full or
    /// closed queue drops the click but still returns the URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the lookup itself fails.
    pub async fn resolve(&self, short_code: &str) -> Result<Option<String>, AppError> {
        if !is_valid_code(short_code) {
            return Ok(None);
        }

        let Some(record) = self.store.find_by_short_code(short_code).await? else {
            return Ok(None);
        };

        metrics::counter!("tinylink_redirects_total").increment(1);
        self.record_click(&record.short_code);

        Ok(Some(record.original_url))
    }

    /// Returns click statistics for a short code, or `None` if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store failures.
    pub async fn stats(&self, short_code: &str) -> Result<Option<UrlStats>, AppError> {
        if !is_valid_code(short_code) {
            return Ok(None);
        }

        Ok(self.store.get_stats(short_code).await?)
    }

    /// Checks that the store answers queries.
    pub async fn check_store(&self) -> Result<(), AppError> {
        Ok(self.store.ping().await?)
    }

    /// Remaining click queue capacity, or `None` if the worker is gone.
    pub fn click_queue_status(&self) -> Option<usize> {
        if self.click_sender.is_closed() {
            None
        } else {
            Some(self.click_sender.capacity())
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }

    fn outcome(&self, record: UrlRecord, status: ShortenStatus) -> ShortenOutcome {
        ShortenOutcome {
            short_url: self.short_url(&record.short_code),
            original_url: record.original_url,
            short_code: record.short_code,
            status,
        }
    }

    fn record_click(&self, short_code: &str) {
        match self.click_sender.try_send(ClickEvent::new(short_code)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                metrics::counter!("tinylink_clicks_dropped_total").increment(1);
                warn!(short_code, "Click queue full, click dropped");
            }
            Err(TrySendError::Closed(_)) => {
                metrics::counter!("tinylink_clicks_dropped_total").increment(1);
                error!(short_code, "Click queue closed, click dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlStore;
    use crate::utils::code_generator::MockCodeGenerator;
    use chrono::Utc;
    use mockall::Sequence;

    const BASE_URL: &str = "http://localhost:3000";

    fn create_test_record(id: i64, url: &str, code: &str) -> UrlRecord {
        UrlRecord::new(id, url.to_string(), code.to_string(), 0, Utc::now())
    }

    fn create_service(
        store: MockUrlStore,
        generator: MockCodeGenerator,
    ) -> (
        UrlService<MockUrlStore, MockCodeGenerator>,
        mpsc::Receiver<ClickEvent>,
    ) {
        let (tx, rx) = mpsc::channel(100);
        let service = UrlService::new(Arc::new(store), Arc::new(generator), tx, BASE_URL);
        (service, rx)
    }

    #[tokio::test]
    async fn test_shorten_creates_new_link() {
        let mut store = MockUrlStore::new();
        let mut generator = MockCodeGenerator::new();

        store
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        generator
            .expect_generate()
            .times(1)
            .return_const("Ab3xQ9z".to_string());
        store
            .expect_insert()
            .withf(|url, code| url == "https://example.com/a/b" && code == "Ab3xQ9z")
            .times(1)
            .returning(|url, code| Ok(create_test_record(1, url, code)));

        let (service, _rx) = create_service(store, generator);

        let outcome = service.shorten("https://example.com/a/b").await.unwrap();

        assert_eq!(outcome.status, ShortenStatus::Created);
        assert!(outcome.is_created());
        assert_eq!(outcome.short_code, "Ab3xQ9z");
        assert_eq!(outcome.original_url, "https://example.com/a/b");
        assert_eq!(outcome.short_url, "http://localhost:3000/Ab3xQ9z");
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_link() {
        let mut store = MockUrlStore::new();
        let mut generator = MockCodeGenerator::new();

        let existing = create_test_record(5, "https://example.com", "existng");
        store
            .expect_find_by_original_url()
            .withf(|url| url == "https://example.com")
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        generator.expect_generate().times(0);
        store.expect_insert().times(0);

        let (service, _rx) = create_service(store, generator);

        let outcome = service.shorten("https://example.com").await.unwrap();

        assert_eq!(outcome.status, ShortenStatus::Existing);
        assert_eq!(outcome.short_code, "existng");
        assert_eq!(outcome.short_url, "http://localhost:3000/existng");
    }

    #[tokio::test]
    async fn test_shorten_retries_after_collision() {
        let mut store = MockUrlStore::new();
        let mut generator = MockCodeGenerator::new();
        let mut seq = Sequence::new();

        store
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .return_const("dup0001".to_string());
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .return_const("fresh01".to_string());
        store
            .expect_insert()
            .withf(|_, code| code == "dup0001")
            .times(1)
            .returning(|_, code| Err(StoreError::DuplicateCode(code.to_string())));
        store
            .expect_insert()
            .withf(|_, code| code == "fresh01")
            .times(1)
            .returning(|url, code| Ok(create_test_record(2, url, code)));

        let (service, _rx) = create_service(store, generator);

        let outcome = service.shorten("https://example.com/x").await.unwrap();

        assert_eq!(outcome.status, ShortenStatus::Created);
        assert_eq!(outcome.short_code, "fresh01");
    }

    #[tokio::test]
    async fn test_shorten_skips_reserved_codes() {
        let mut store = MockUrlStore::new();
        let mut generator = MockCodeGenerator::new();
        let mut seq = Sequence::new();

        store
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .return_const("shorten".to_string());
        generator
            .expect_generate()
            .times(1)
            .in_sequence(&mut seq)
            .return_const("okcode1".to_string());
        store
            .expect_insert()
            .withf(|_, code| code == "okcode1")
            .times(1)
            .returning(|url, code| Ok(create_test_record(3, url, code)));

        let (service, _rx) = create_service(store, generator);

        let outcome = service.shorten("https://example.com/y").await.unwrap();

        assert_eq!(outcome.short_code, "okcode1");
    }

    #[tokio::test]
    async fn test_shorten_fails_when_code_space_exhausted() {
        let mut store = MockUrlStore::new();
        let mut generator = MockCodeGenerator::new();

        store
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        generator
            .expect_generate()
            .times(3)
            .return_const("taken01".to_string());
        store
            .expect_insert()
            .times(3)
            .returning(|_, code| Err(StoreError::DuplicateCode(code.to_string())));

        let (service, _rx) = create_service(store, generator);
        let service = service.with_max_attempts(3);

        let result = service.shorten("https://example.com").await;

        assert!(matches!(
            result.unwrap_err(),
            AppError::CodeSpaceExhausted { .. }
        ));
    }

    #[tokio::test]
    async fn test_shorten_propagates_store_errors() {
        let mut store = MockUrlStore::new();
        let mut generator = MockCodeGenerator::new();

        store
            .expect_find_by_original_url()
            .times(1)
            .returning(|_| Ok(None));
        generator
            .expect_generate()
            .times(1)
            .return_const("abcdefg".to_string());
        store
            .expect_insert()
            .times(1)
            .returning(|_, _| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let (service, _rx) = create_service(store, generator);

        let result = service.shorten("https://example.com").await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_enqueues_click() {
        let mut store = MockUrlStore::new();
        let record = create_test_record(1, "https://example.com/a/b", "Ab3xQ9z");
        store
            .expect_find_by_short_code()
            .withf(|code| code == "Ab3xQ9z")
            .times(1)
            .returning(move |_| Ok(Some(record.clone())));
        store.expect_increment_clicks().times(0);

        let (service, mut rx) = create_service(store, MockCodeGenerator::new());

        let url = service.resolve("Ab3xQ9z").await.unwrap();

        assert_eq!(url.as_deref(), Some("https://example.com/a/b"));
        assert_eq!(rx.try_recv().unwrap(), ClickEvent::new("Ab3xQ9z"));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code_has_no_side_effects() {
        let mut store = MockUrlStore::new();
        store
            .expect_find_by_short_code()
            .times(1)
            .returning(|_| Ok(None));
        store.expect_increment_clicks().times(0);
        store.expect_insert().times(0);

        let (service, mut rx) = create_service(store, MockCodeGenerator::new());

        let url = service.resolve("doesnotexist").await.unwrap();

        assert!(url.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_codes_outside_alphabet_skip_the_store() {
        let mut store = MockUrlStore::new();
        store.expect_find_by_short_code().times(0);
        store.expect_get_stats().times(0);

        let (service, mut rx) = create_service(store, MockCodeGenerator::new());

        for code in ["bad.code", "a b", "caf\u{e9}", ""] {
            assert!(service.resolve(code).await.unwrap().is_none());
            assert!(service.stats(code).await.unwrap().is_none());
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_succeeds_when_click_queue_closed() {
        let mut store = MockUrlStore::new();
        let record = create_test_record(1, "https://example.com", "abc1234");
        store
            .expect_find_by_short_code()
            .returning(move |_| Ok(Some(record.clone())));

        let (service, rx) = create_service(store, MockCodeGenerator::new());
        drop(rx);

        let url = service.resolve("abc1234").await.unwrap();

        assert_eq!(url.as_deref(), Some("https://example.com"));
        assert_eq!(service.click_queue_status(), None);
    }

    #[tokio::test]
    async fn test_resolve_succeeds_when_click_queue_full() {
        let mut store = MockUrlStore::new();
        let record = create_test_record(1, "https://example.com", "abc1234");
        store
            .expect_find_by_short_code()
            .times(2)
            .returning(move |_| Ok(Some(record.clone())));

        let (tx, mut rx) = mpsc::channel(1);
        let service = UrlService::new(
            Arc::new(store),
            Arc::new(MockCodeGenerator::new()),
            tx,
            BASE_URL,
        );

        assert!(service.resolve("abc1234").await.unwrap().is_some());
        assert!(service.resolve("abc1234").await.unwrap().is_some());

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stats_passthrough() {
        let mut store = MockUrlStore::new();
        let stats = UrlStats {
            short_code: "Ab3xQ9z".to_string(),
            original_url: "https://example.com/a/b".to_string(),
            clicks: 1,
            created_at: Utc::now(),
        };
        let expected = stats.clone();
        store
            .expect_get_stats()
            .withf(|code| code == "Ab3xQ9z")
            .times(1)
            .returning(move |_| Ok(Some(stats.clone())));

        let (service, _rx) = create_service(store, MockCodeGenerator::new());

        assert_eq!(service.stats("Ab3xQ9z").await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_stats_not_found() {
        let mut store = MockUrlStore::new();
        store.expect_get_stats().times(1).returning(|_| Ok(None));

        let (service, _rx) = create_service(store, MockCodeGenerator::new());

        assert!(service.stats("nope").await.unwrap().is_none());
    }

    #[test]
    fn test_short_url_trims_trailing_slash() {
        let (tx, _rx) = mpsc::channel(1);
        let service = UrlService::new(
            Arc::new(MockUrlStore::new()),
            Arc::new(MockCodeGenerator::new()),
            tx,
            "https://s.example.com/",
        );

        assert_eq!(service.short_url("abc"), "https://s.example.com/abc");
    }
}
