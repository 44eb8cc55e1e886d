mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use link_shortener::api::handlers::redirect_handler;

fn redirect_router(state: link_shortener::AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state)
}

#[tokio::test]
async fn test_redirect_success() {
    let app = common::create_test_state().await;
    common::create_link(&app.repository, "redirect1", "https://example.com/target", 1).await;

    let server = TestServer::new(redirect_router(app.state)).unwrap();

    let response = server.get("/redirect1").await;

    assert_eq!(response.status_code(), 307);

    let location = response.header("location");
    assert_eq!(location, "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::create_test_state().await;
    let server = TestServer::new(redirect_router(app.state)).unwrap();

    let response = server.get("/nonexistent").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_redirect_malformed_code_not_found() {
    let app = common::create_test_state().await;
    let server = TestServer::new(redirect_router(app.state)).unwrap();

    let response = server.get(&format!("/{}", "a".repeat(64))).await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_redirect_deleted_link_is_gone() {
    let app = common::create_test_state().await;
    common::create_link(&app.repository, "deleted1", "https://example.com/old", 4).await;

    app.state
        .link_service
        .delete_user_links(4, vec!["deleted1".to_string()])
        .await
        .unwrap();
    app.state.deletions.stop().await;

    let server = TestServer::new(redirect_router(app.state)).unwrap();

    let response = server.get("/deleted1").await;

    assert_eq!(response.status_code(), 410);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "gone");
}
