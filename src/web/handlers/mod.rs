//! Web API handlers.

mod auth;
mod feeds;

pub use auth::{login, register};
pub use feeds::{add_feed, force_update, list_feeds, mark_read};

use std::sync::Arc;

use crate::db::DbPool;
use crate::feed::IngestionCoordinator;
use crate::web::middleware::JwtState;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Subscribe/refresh coordinator.
    pub coordinator: IngestionCoordinator,
    /// JWT issue/verify state.
    pub jwt: Arc<JwtState>,
}

impl AppState {
    pub fn new(pool: DbPool, coordinator: IngestionCoordinator, jwt: Arc<JwtState>) -> Self {
        Self {
            pool,
            coordinator,
            jwt,
        }
    }
}
