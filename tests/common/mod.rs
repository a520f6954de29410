//! Shared test helpers.

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};

use feedpool::config::ServerConfig;
use feedpool::feed::{FeedFetcher, IngestionCoordinator, RefreshPolicy};
use feedpool::web::handlers::AppState;
use feedpool::web::middleware::JwtState;
use feedpool::web::router::create_router;
use feedpool::Database;

pub fn test_server_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-secret-key-for-testing-only".to_string(),
        token_expiry_secs: 900,
    }
}

/// Build a test server over an in-memory database.
///
/// The database handle is returned so tests can inspect state behind
/// the API.
pub async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with_policy(RefreshPolicy::FrozenBacklog).await
}

pub async fn create_test_server_with_policy(
    policy: RefreshPolicy,
) -> (TestServer, Database) {
    let config = test_server_config();

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let coordinator = IngestionCoordinator::new(
        db.pool().clone(),
        FeedFetcher::new().expect("Failed to create fetcher"),
        policy,
    );

    let jwt_state = Arc::new(JwtState::new(&config.jwt_secret, config.token_expiry_secs));
    let state = AppState::new(db.pool().clone(), coordinator, jwt_state.clone());

    let router: Router = create_router(state, jwt_state);
    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

/// Register a user and log in, returning the bearer token.
pub async fn register_and_login(server: &TestServer, username: &str, password: &str) -> String {
    server
        .post("/user")
        .json(&json!({"username": username, "password": password}))
        .await
        .assert_status_ok();

    let response = server
        .post("/login")
        .json(&json!({"username": username, "password": password}))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    body["token"].as_str().expect("token in response").to_string()
}

/// Build an RSS document with one item per title.
pub fn rss_body(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .map(|t| {
            format!("<item><title>{t}</title><link>https://example.com/{t}</link><description>{t} summary</description></item>")
        })
        .collect();
    format!(
        r#"<?xml version="1.0"?><rss version="2.0"><channel><title>Test Feed</title>{items}</channel></rss>"#
    )
}
