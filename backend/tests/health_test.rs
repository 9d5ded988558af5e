//! Health endpoint tests

mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn test_health_endpoint() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_readiness_checks_database() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health/ready", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_liveness_endpoint() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/health/live", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/nonexistent", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
