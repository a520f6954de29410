use tracing::info;

use feedpool::feed::{FeedFetcher, IngestionCoordinator, RefreshPolicy};
use feedpool::refresh::RefreshWorker;
use feedpool::web::WebServer;
use feedpool::{Config, Database, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = feedpool::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        feedpool::logging::init_console_only(&config.logging.level);
    }

    info!("feedpool - RSS aggregation backend");

    let db = Database::open(&config.database.path).await?;
    let fetcher = FeedFetcher::new()?;
    let coordinator = IngestionCoordinator::new(
        db.pool().clone(),
        fetcher,
        RefreshPolicy::FrozenBacklog,
    );

    // Background refresh worker
    let worker = RefreshWorker::new(db.pool().clone(), coordinator.clone(), &config.refresh);
    tokio::spawn(async move {
        if let Err(e) = worker.run().await {
            tracing::error!(error = %e, "refresh worker stopped");
        }
    });

    let server = WebServer::new(&config.server, db.pool().clone(), coordinator)?;
    info!(
        "server configured on {}:{}",
        config.server.host, config.server.port
    );
    server.run().await
}
