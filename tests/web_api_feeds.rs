//! Web API feed tests.
//!
//! Integration tests for subscribing, listing, read-state filtering,
//! and marking items read. Upstream feeds are served by wiremock.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{create_test_server, register_and_login, rss_body};

async fn serve_feed(titles: &[&str]) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(rss_body(titles)))
        .mount(&server)
        .await;
    server
}

async fn add_feed(server: &TestServer, token: &str, url: &str) -> Value {
    let response = server
        .post("/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({"feedUrl": url}))
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn test_add_feed_and_list_items() {
    let feed = serve_feed(&["first", "second"]).await;
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;

    let body = add_feed(&server, &token, &feed.uri()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Inserted successfully");

    let response = server
        .get("/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    response.assert_status_ok();

    let items: Value = response.json();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], 1);
    assert_eq!(items[0]["url"], feed.uri());
    assert_eq!(items[0]["data"]["title"], "first");
    assert_eq!(items[1]["id"], 2);
    assert_eq!(items[1]["data"]["title"], "second");
}

#[tokio::test]
async fn test_add_feed_twice_reports_already_followed() {
    let feed = serve_feed(&["a"]).await;
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;

    add_feed(&server, &token, &feed.uri()).await;
    let body = add_feed(&server, &token, &feed.uri()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "URL already followed by user");
}

#[tokio::test]
async fn test_add_feed_requires_url() {
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;

    let response = server
        .post("/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_feed_unreachable_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&upstream)
        .await;
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;

    let response = server
        .post("/feeds")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({"feedUrl": upstream.uri()}))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_two_users_share_stored_items() {
    let feed = serve_feed(&["a", "b"]).await;
    let (server, _db) = create_test_server().await;
    let alice = register_and_login(&server, "1", "password123").await;
    let bob = register_and_login(&server, "2", "password123").await;

    add_feed(&server, &alice, &feed.uri()).await;
    add_feed(&server, &bob, &feed.uri()).await;

    // The upstream was fetched for each subscribe, but items are stored
    // once; both users see the same two seqs.
    for token in [&alice, &bob] {
        let response = server
            .get("/feeds")
            .add_header(AUTHORIZATION, format!("Bearer {token}"))
            .await;
        let items: Value = response.json();
        assert_eq!(items.as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn test_mark_read_and_filter() {
    let feed = serve_feed(&["a", "b", "c"]).await;
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;
    add_feed(&server, &token, &feed.uri()).await;

    let response = server
        .put("/markread")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({"feedUrl": feed.uri(), "itemId": "1,3"}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Item ids marked read.");

    let read: Value = server
        .get("/feeds")
        .add_query_param("feedUrl", feed.uri())
        .add_query_param("marked", "read")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await
        .json();
    let read = read.as_array().unwrap();
    assert_eq!(read.len(), 2);
    assert_eq!(read[0]["id"], 1);
    assert_eq!(read[1]["id"], 3);

    let unread: Value = server
        .get("/feeds")
        .add_query_param("feedUrl", feed.uri())
        .add_query_param("marked", "unread")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await
        .json();
    let unread = unread.as_array().unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0]["id"], 2);
}

#[tokio::test]
async fn test_read_state_does_not_leak_between_users() {
    let feed = serve_feed(&["a"]).await;
    let (server, _db) = create_test_server().await;
    let alice = register_and_login(&server, "1", "password123").await;
    let bob = register_and_login(&server, "2", "password123").await;
    add_feed(&server, &alice, &feed.uri()).await;
    add_feed(&server, &bob, &feed.uri()).await;

    server
        .put("/markread")
        .add_header(AUTHORIZATION, format!("Bearer {alice}"))
        .json(&json!({"feedUrl": feed.uri(), "itemId": "1"}))
        .await
        .assert_status_ok();

    // Bob still sees the item unread.
    let unread: Value = server
        .get("/feeds")
        .add_query_param("feedUrl", feed.uri())
        .add_query_param("marked", "unread")
        .add_header(AUTHORIZATION, format!("Bearer {bob}"))
        .await
        .json();
    assert_eq!(unread.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_filtered_listing_with_no_matches() {
    let feed = serve_feed(&["a"]).await;
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;
    add_feed(&server, &token, &feed.uri()).await;

    // Nothing marked read yet.
    let response = server
        .get("/feeds")
        .add_query_param("feedUrl", feed.uri())
        .add_query_param("marked", "read")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No items in the feed that are read.");
}

#[tokio::test]
async fn test_filtered_listing_requires_feed_url() {
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;

    let response = server
        .get("/feeds")
        .add_query_param("marked", "unread")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_read_unknown_subscription() {
    let (server, _db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;

    let response = server
        .put("/markread")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .json(&json!({"feedUrl": "https://nowhere.example/feed", "itemId": "1"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_equivalent_urls_collapse_to_one_feed() {
    // Same host/path modulo punctuation: one shared item pool.
    let feed = serve_feed(&["a"]).await;
    let (server, db) = create_test_server().await;
    let token = register_and_login(&server, "1", "password123").await;

    let with_slash = format!("{}/", feed.uri());
    add_feed(&server, &token, &feed.uri()).await;
    add_feed(&server, &token, &with_slash).await;

    // Two subscription rows, one feed_key behind them.
    let keys: Vec<String> =
        sqlx::query_scalar("SELECT DISTINCT feed_key FROM subscriptions WHERE user_id = 1")
            .fetch_all(db.pool())
            .await
            .unwrap();
    assert_eq!(keys.len(), 1);

    let item_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feed_items")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(item_count, 1);
}
