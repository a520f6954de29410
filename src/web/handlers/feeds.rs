//! Feed subscription, listing, read-state, and refresh handlers.

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::feed::IngestOutcome;
use crate::refresh::RefreshQueue;
use crate::store::{ItemRepository, SubscriptionRepository};
use crate::web::dto::{
    FeedItemResponse, FeedUrlRequest, FeedsQuery, MarkReadRequest, ScheduleResponse,
    StatusResponse,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

/// POST /feeds - subscribe the user to a feed URL.
pub async fn add_feed(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FeedUrlRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if req.feed_url.is_empty() {
        return Err(ApiError::bad_request("url is required"));
    }

    let outcome = state.coordinator.ingest(auth.user_id, &req.feed_url).await?;
    let message = match outcome {
        IngestOutcome::Inserted => "Inserted successfully",
        IngestOutcome::AlreadyFollowed => "URL already followed by user",
    };

    Ok(Json(StatusResponse::ok(message)))
}

/// GET /feeds - list items, optionally filtered by read state.
///
/// Without `marked`, every item across the user's subscriptions is
/// returned. With `marked=read|unread`, `feedUrl` selects the feed and
/// the result is filtered through the user's read-state overlay; no
/// matching items is a 200 status body, not an error.
pub async fn list_feeds(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<FeedsQuery>,
) -> Result<Response, ApiError> {
    let items = ItemRepository::new(&state.pool);

    let marked = match query.marked.as_deref() {
        None | Some("") => {
            let records = items.list_items(auth.user_id).await?;
            let body: Vec<FeedItemResponse> =
                records.into_iter().map(FeedItemResponse::from).collect();
            return Ok(Json(body).into_response());
        }
        Some("read") => true,
        Some("unread") => false,
        Some(other) => {
            return Err(ApiError::bad_request(format!(
                "marked must be read or unread, got {other}"
            )));
        }
    };

    let url = query
        .feed_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::bad_request("Please provide feedUrl!"))?;

    let subscriptions = SubscriptionRepository::new(&state.pool);
    let subscription = subscriptions
        .find(auth.user_id, &url)
        .await?
        .ok_or_else(|| ApiError::not_found("subscription not found"))?;

    let records = items
        .list_items_filtered(auth.user_id, &subscription.feed_key, marked)
        .await?;

    if records.is_empty() {
        let label = if marked { "read" } else { "unread" };
        let body = StatusResponse::failed(format!("No items in the feed that are {label}."));
        return Ok(Json(body).into_response());
    }

    let body: Vec<FeedItemResponse> =
        records.into_iter().map(FeedItemResponse::from).collect();
    Ok(Json(body).into_response())
}

/// PUT /markread - mark feed items read.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    if req.feed_url.is_empty() {
        return Err(ApiError::bad_request("Please provide feedUrl!"));
    }

    let item_seqs: Vec<i64> = req
        .item_id
        .split(',')
        .map(|part| part.trim().parse())
        .collect::<Result<_, _>>()
        .map_err(|_| ApiError::bad_request("itemId must be a comma-separated list of numbers."))?;

    let subscriptions = SubscriptionRepository::new(&state.pool);
    let subscription = subscriptions
        .find(auth.user_id, &req.feed_url)
        .await?
        .ok_or_else(|| ApiError::not_found("subscription not found"))?;

    let items = ItemRepository::new(&state.pool);
    items
        .mark_read(auth.user_id, &subscription.feed_key, &item_seqs)
        .await?;

    Ok(Json(StatusResponse::ok("Item ids marked read.")))
}

/// PUT /update - schedule an asynchronous feed refresh.
pub async fn force_update(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<FeedUrlRequest>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    if req.feed_url.is_empty() {
        return Err(ApiError::bad_request("Please provide feedUrl!"));
    }

    let queue = RefreshQueue::new(&state.pool);
    let task_id = queue.enqueue(auth.user_id, &req.feed_url, 0, 0).await?;

    Ok(Json(ScheduleResponse {
        success: true,
        message: "Feed update task has been scheduled.".to_string(),
        task_id,
    }))
}
