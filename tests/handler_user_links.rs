mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::routes::router;
use serde_json::json;

#[tokio::test]
async fn test_list_user_links() {
    let app = common::create_test_state().await;
    common::create_link(&app.repository, "first001", "https://one.example.com/", 5).await;
    common::create_link(&app.repository, "second02", "https://two.example.com/", 5).await;
    common::create_link(&app.repository, "foreign3", "https://three.example.com/", 6).await;

    let server = TestServer::new(router(app.state)).unwrap();

    let response = server.get("/api/user/urls").add_header("X-User-Id", "5").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(
        json,
        json!([
            { "short_url": "http://short.test/first001", "original_url": "https://one.example.com/" },
            { "short_url": "http://short.test/second02", "original_url": "https://two.example.com/" }
        ])
    );
}

#[tokio::test]
async fn test_list_without_links_is_no_content() {
    let app = common::create_test_state().await;
    let server = TestServer::new(router(app.state)).unwrap();

    let response = server.get("/api/user/urls").add_header("X-User-Id", "99").await;

    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_requires_valid_user() {
    let app = common::create_test_state().await;
    let server = TestServer::new(router(app.state)).unwrap();

    let response = server
        .get("/api/user/urls")
        .add_header("X-User-Id", "not-a-number")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_is_accepted_and_applied_in_background() {
    let app = common::create_test_state().await;
    common::create_link(&app.repository, "mine0001", "https://mine.example.com/", 3).await;
    common::create_link(&app.repository, "theirs01", "https://theirs.example.com/", 4).await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let response = server
        .delete("/api/user/urls")
        .add_header("X-User-Id", "3")
        .json(&json!(["mine0001", "theirs01"]))
        .await;

    response.assert_status(StatusCode::ACCEPTED);

    app.state.deletions.stop().await;

    let mine = app.repository.find_by_code("mine0001").await.unwrap().unwrap();
    let theirs = app.repository.find_by_code("theirs01").await.unwrap().unwrap();
    assert!(mine.is_deleted());
    assert!(!theirs.is_deleted());

    server
        .get("/api/user/urls")
        .add_header("X-User-Id", "3")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server.get("/mine0001").await.assert_status(StatusCode::GONE);
}

#[tokio::test]
async fn test_delete_rejects_malformed_codes() {
    let app = common::create_test_state().await;
    let server = TestServer::new(router(app.state)).unwrap();

    let response = server
        .delete("/api/user/urls")
        .add_header("X-User-Id", "3")
        .json(&json!(["ok-code", "not a code"]))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["details"]["codes"], json!(["not a code"]));
}

#[tokio::test]
async fn test_delete_during_shutdown_is_unavailable() {
    let app = common::create_test_state().await;
    app.state.deletions.stop().await;

    let server = TestServer::new(router(app.state)).unwrap();

    let response = server
        .delete("/api/user/urls")
        .add_header("X-User-Id", "3")
        .json(&json!(["abc"]))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
