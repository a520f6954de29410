//! Request bodies and query parameters.

use serde::Deserialize;

/// POST /user and POST /login body.
///
/// `username` is the numeric user id as a string; clients have always
/// sent it that way.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /feeds and PUT /update body.
#[derive(Debug, Deserialize)]
pub struct FeedUrlRequest {
    #[serde(rename = "feedUrl", default)]
    pub feed_url: String,
}

/// PUT /markread body. `item_id` is a comma-separated seq list.
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    #[serde(rename = "feedUrl", default)]
    pub feed_url: String,
    #[serde(rename = "itemId", default)]
    pub item_id: String,
}

/// GET /feeds query parameters.
#[derive(Debug, Deserialize)]
pub struct FeedsQuery {
    #[serde(rename = "feedUrl")]
    pub feed_url: Option<String>,
    pub marked: Option<String>,
}
