//! Router configuration for the Web API.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{add_feed, force_update, list_feeds, login, mark_read, register, AppState};
use super::middleware::{jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(state: AppState, jwt_state: Arc<JwtState>) -> Router {
    let jwt_state_for_middleware = jwt_state.clone();

    Router::new()
        .route("/user", post(register))
        .route("/login", post(login))
        .route("/feeds", get(list_feeds).post(add_feed))
        .route("/markread", put(mark_read))
        .route("/update", put(force_update))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
