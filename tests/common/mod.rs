#![allow(dead_code)]

use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tinylink::application::services::UrlService;
use tinylink::domain::click_event::ClickEvent;
use tinylink::infrastructure::persistence::SqliteUrlStore;
use tinylink::infrastructure::persistence::database::{self, PoolSettings};
use tinylink::state::AppState;
use tinylink::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://localhost:3000";

/// Migrated SQLite database living in a temporary directory.
///
/// The directory is removed when the value is dropped, so keep it alive for
/// the duration of the test.
pub struct TestDb {
    pub pool: SqlitePool,
    _dir: TempDir,
}

impl TestDb {
    pub fn store(&self) -> Arc<SqliteUrlStore> {
        Arc::new(SqliteUrlStore::new(Arc::new(self.pool.clone())))
    }
}

pub async fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("urls.db").display());

    let settings = PoolSettings {
        max_connections: 8,
        ..PoolSettings::default()
    };

    let pool = database::connect(&url, &settings).await.unwrap();
    database::run_migrations(&pool).await.unwrap();

    TestDb { pool, _dir: dir }
}

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) {
    sqlx::query("INSERT INTO urls (original_url, short_code) VALUES (?1, ?2)")
        .bind(url)
        .bind(code)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn clicks_for(pool: &SqlitePool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT clicks FROM urls WHERE short_code = ?1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn count_links(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Builds application state over the test database.
///
/// The click receiver is returned instead of spawning a worker so tests can
/// inspect queued events directly.
pub fn create_test_state(db: &TestDb) -> (AppState, mpsc::Receiver<ClickEvent>) {
    create_test_state_with(db, Arc::new(RandomCodeGenerator::default()), 5)
}

/// Builds application state with a custom generator and attempt limit.
pub fn create_test_state_with(
    db: &TestDb,
    generator: Arc<dyn CodeGenerator>,
    max_attempts: usize,
) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let service =
        UrlService::new(db.store(), generator, tx, BASE_URL).with_max_attempts(max_attempts);

    (AppState::new(Arc::new(service)), rx)
}

/// Generator that hands out a fixed script of codes, then falls back to random ones.
pub struct ScriptedGenerator {
    codes: Mutex<VecDeque<String>>,
    fallback: RandomCodeGenerator,
}

impl ScriptedGenerator {
    pub fn new(codes: &[&str]) -> Self {
        Self {
            codes: Mutex::new(codes.iter().map(|c| c.to_string()).collect()),
            fallback: RandomCodeGenerator::default(),
        }
    }
}

impl CodeGenerator for ScriptedGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.generate())
    }
}
