mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use link_shortener::api::handlers::health_handler;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::create_test_state().await;
    let router = Router::new()
        .route("/health", get(health_handler))
        .with_state(app.state);

    let server = TestServer::new(router).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["storage"]["status"], "ok");
    assert_eq!(json["checks"]["deletion_queue"]["status"], "ok");
    assert_eq!(json["checks"]["audit_queue"]["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_stopped_pipelines() {
    let app = common::create_test_state().await;
    app.state.deletions.stop().await;

    let router = Router::new()
        .route("/health", get(health_handler))
        .with_state(app.state.clone());

    let server = TestServer::new(router).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["deletion_queue"]["status"], "error");
    assert_eq!(json["checks"]["audit_queue"]["status"], "ok");

    app.state.audit.stop().await;
}
