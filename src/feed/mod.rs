//! Feed fetching, identity derivation, and ingestion.

pub mod fetcher;
pub mod identity;
pub mod ingest;
pub mod types;

pub use fetcher::{FeedFetcher, FetchError};
pub use identity::derive_key;
pub use ingest::{IngestOutcome, IngestionCoordinator, RefreshPolicy};
pub use types::{ItemPayload, ParsedFeed};
