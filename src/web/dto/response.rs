//! Response bodies.

use serde::Serialize;

use crate::feed::ItemPayload;
use crate::store::ItemRecord;

/// Flat `{success, message}` status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// POST /login success response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// One element of the GET /feeds array.
#[derive(Debug, Serialize)]
pub struct FeedItemResponse {
    /// Item seq within its feed.
    pub id: i64,
    /// Subscription URL the item belongs to.
    pub url: String,
    /// The stored entry payload.
    pub data: ItemPayload,
}

impl From<ItemRecord> for FeedItemResponse {
    fn from(record: ItemRecord) -> Self {
        Self {
            id: record.item_seq,
            url: record.url,
            data: record.payload,
        }
    }
}

/// PUT /update response carrying the queued task id.
#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub success: bool,
    pub message: String,
    pub task_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_item_response_shape() {
        let response = FeedItemResponse {
            id: 3,
            url: "https://example.com/feed".to_string(),
            data: ItemPayload {
                title: "T".to_string(),
                summary: None,
                link: None,
                published: None,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["url"], "https://example.com/feed");
        assert_eq!(json["data"]["title"], "T");
    }

    #[test]
    fn test_status_response() {
        let json = serde_json::to_value(StatusResponse::ok("User created!")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "User created!");
    }
}
