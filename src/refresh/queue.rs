//! Durable refresh work queue.
//!
//! Messages are rows in the refresh_queue table, so scheduled work
//! survives a process restart. A message is either waiting (`queued`)
//! or claimed by the worker (`running`); terminal outcomes remove the
//! row. Retries are new messages carrying the failure counter in the
//! body, never in-place edits.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::DbPool;
use crate::{FeedPoolError, Result};

/// Stored lifecycle states of a queue row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Waiting for its availability time.
    Queued,
    /// Claimed by the worker.
    Running,
}

impl QueueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueState::Queued => "queued",
            QueueState::Running => "running",
        }
    }
}

/// A refresh request message.
///
/// `args` is the [user_id, url] pair; `failed_attempts` counts fetch
/// failures of earlier incarnations of this request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshMessage {
    pub args: (i64, String),
    pub message_id: String,
    pub failed_attempts: u32,
}

impl RefreshMessage {
    pub fn user_id(&self) -> i64 {
        self.args.0
    }

    pub fn url(&self) -> &str {
        &self.args.1
    }
}

/// Repository for the refresh_queue table.
pub struct RefreshQueue<'a> {
    pool: &'a DbPool,
}

impl<'a> RefreshQueue<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Enqueue a refresh request, available after `delay_secs`.
    ///
    /// Returns the generated message id.
    pub async fn enqueue(
        &self,
        user_id: i64,
        url: &str,
        failed_attempts: u32,
        delay_secs: u64,
    ) -> Result<String> {
        let message_id = Uuid::new_v4().to_string();
        let message = RefreshMessage {
            args: (user_id, url.to_string()),
            message_id: message_id.clone(),
            failed_attempts,
        };
        let body = serde_json::to_string(&message)
            .map_err(|e| FeedPoolError::Queue(format!("message encode: {e}")))?;

        sqlx::query(
            "INSERT INTO refresh_queue (message_id, body, state, available_at)
             VALUES ($1, $2, $3, datetime('now', $4))",
        )
        .bind(&message_id)
        .bind(&body)
        .bind(QueueState::Queued.as_str())
        .bind(format!("+{delay_secs} seconds"))
        .execute(self.pool)
        .await?;

        tracing::debug!(message_id, user_id, url, failed_attempts, "message enqueued");
        Ok(message_id)
    }

    /// Claim up to `limit` due messages.
    ///
    /// The claim is a single UPDATE ... RETURNING, so each message is
    /// handed to at most one consumer. Rows whose body no longer
    /// parses are dropped with an error log instead of being requeued.
    pub async fn claim(&self, limit: u32) -> Result<Vec<RefreshMessage>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "UPDATE refresh_queue SET state = $1
             WHERE message_id IN (
                 SELECT message_id FROM refresh_queue
                 WHERE state = $2 AND datetime(available_at) <= datetime('now')
                 ORDER BY datetime(available_at), created_at
                 LIMIT $3
             )
             RETURNING message_id, body",
        )
        .bind(QueueState::Running.as_str())
        .bind(QueueState::Queued.as_str())
        .bind(limit as i64)
        .fetch_all(self.pool)
        .await?;

        let mut messages = Vec::with_capacity(rows.len());
        for (message_id, body) in rows {
            match serde_json::from_str::<RefreshMessage>(&body) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    tracing::error!(message_id, error = %e, "dropping unparseable message");
                    self.ack(&message_id).await?;
                }
            }
        }
        Ok(messages)
    }

    /// Remove a message from the queue (terminal outcome).
    pub async fn ack(&self, message_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM refresh_queue WHERE message_id = $1")
            .bind(message_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Return crashed `running` rows to `queued`.
    ///
    /// Called once at worker startup; any row still marked running was
    /// claimed by a process that died before finishing it.
    pub async fn requeue_stale(&self) -> Result<u64> {
        let result =
            sqlx::query("UPDATE refresh_queue SET state = $1 WHERE state = $2")
                .bind(QueueState::Queued.as_str())
                .bind(QueueState::Running.as_str())
                .execute(self.pool)
                .await?;

        let requeued = result.rows_affected();
        if requeued > 0 {
            tracing::warn!(requeued, "requeued messages from a previous run");
        }
        Ok(requeued)
    }

    /// Number of messages currently waiting.
    pub async fn queued_count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM refresh_queue WHERE state = $1")
                .bind(QueueState::Queued.as_str())
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }
}
