mod common;

use axum::{Router, http::StatusCode, routing::get};
use axum_test::TestServer;
use tinylink::api::handlers::health_handler;

#[tokio::test]
async fn test_health_endpoint_success() {
    let db = common::setup_db().await;
    let (state, _rx) = common::create_test_state(&db);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert!(json.get("version").is_some());
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let db = common::setup_db().await;
    let (state, rx) = common::create_test_state(&db);
    drop(rx);

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["click_queue"]["status"], "error");
}

#[tokio::test]
async fn test_health_degraded_when_database_closed() {
    let db = common::setup_db().await;
    let (state, _rx) = common::create_test_state(&db);
    db.pool.close().await;

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["database"]["status"], "error");
}
