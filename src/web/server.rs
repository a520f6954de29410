//! Web server setup.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::db::DbPool;
use crate::feed::IngestionCoordinator;
use crate::{FeedPoolError, Result};

use super::handlers::AppState;
use super::middleware::JwtState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    addr: SocketAddr,
    state: AppState,
    jwt_state: Arc<JwtState>,
}

impl WebServer {
    pub fn new(
        config: &ServerConfig,
        pool: DbPool,
        coordinator: IngestionCoordinator,
    ) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| FeedPoolError::Config(format!("invalid server address: {e}")))?;

        let jwt_state = Arc::new(JwtState::new(&config.jwt_secret, config.token_expiry_secs));
        let state = AppState::new(pool, coordinator, jwt_state.clone());

        Ok(Self {
            addr,
            state,
            jwt_state,
        })
    }

    /// Get the configured server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server until the process is terminated.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state, self.jwt_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::feed::{FeedFetcher, RefreshPolicy};

    #[tokio::test]
    async fn test_web_server_new() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            token_expiry_secs: 3600,
        };
        let db = Database::open_in_memory().await.unwrap();
        let coordinator = IngestionCoordinator::new(
            db.pool().clone(),
            FeedFetcher::new().unwrap(),
            RefreshPolicy::default(),
        );

        let server = WebServer::new(&config, db.pool().clone(), coordinator).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }
}
