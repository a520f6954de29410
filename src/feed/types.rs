//! Feed content types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum feed size in bytes (5MB).
pub const MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// A single feed entry as stored in the shared item pool.
///
/// This is the JSON payload persisted per (feed_key, item_seq) row. All
/// fields come straight from the upstream document; `published` is
/// normalized to RFC 3339 by chrono's serde impl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    /// Entry title.
    pub title: String,
    /// Entry summary or content body.
    pub summary: Option<String>,
    /// Link to the original article.
    pub link: Option<String>,
    /// Publication timestamp, when the upstream document carries one.
    pub published: Option<DateTime<Utc>>,
}

/// A feed document fetched and parsed from an upstream URL.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Feed-level title.
    pub title: String,
    /// Entries in upstream document order.
    pub items: Vec<ItemPayload>,
}
