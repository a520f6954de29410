//! feedpool - multi-user RSS aggregation backend.
//!
//! Users register, authenticate, and subscribe to feed URLs. Feed items
//! are fetched once and shared across all subscribers of a feed, with a
//! per-user read/unread overlay. Background refreshes run through a
//! durable queue with bounded retry.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod logging;
pub mod refresh;
pub mod store;
pub mod web;

pub use auth::{hash_password, validate_password, verify_password, PasswordError};
pub use config::Config;
pub use db::{Database, DbPool, NewUser, User, UserRepository};
pub use error::{FeedPoolError, Result};
pub use feed::{
    derive_key, FeedFetcher, FetchError, IngestOutcome, IngestionCoordinator, ItemPayload,
    RefreshPolicy,
};
pub use refresh::{RefreshOutcome, RefreshQueue, RefreshWorker};
pub use store::{
    ItemRecord, ItemRepository, SubscribeOutcome, Subscription, SubscriptionRepository,
};
pub use web::WebServer;
