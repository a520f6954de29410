//! Background refresh worker.
//!
//! Polls the durable queue, runs each claimed refresh through the
//! ingestion coordinator, and applies the bounded retry policy: fetch
//! failures are re-enqueued as new messages carrying the incremented
//! counter, up to [`MAX_FAILED_ATTEMPTS`]; after that the request is
//! abandoned with a log and no user-facing surface.

use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use crate::config::RefreshConfig;
use crate::db::DbPool;
use crate::feed::IngestionCoordinator;
use crate::refresh::queue::{RefreshMessage, RefreshQueue};
use crate::{FeedPoolError, Result};

/// Maximum fetch failures before a refresh request is abandoned.
pub const MAX_FAILED_ATTEMPTS: u32 = 3;

/// Delay before a failed refresh is attempted again, in seconds.
pub const RETRY_DELAY_SECS: u64 = 300;

/// Terminal outcome of processing one claimed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The refresh ran to completion.
    Succeeded,
    /// A transient failure; a successor message was enqueued.
    Retrying,
    /// Gave up: retries exhausted or the subscription is gone.
    Abandoned,
}

/// Queue-driven refresh worker.
pub struct RefreshWorker {
    pool: DbPool,
    coordinator: IngestionCoordinator,
    poll_interval: Duration,
    claim_batch: u32,
}

impl RefreshWorker {
    pub fn new(pool: DbPool, coordinator: IngestionCoordinator, config: &RefreshConfig) -> Self {
        Self {
            pool,
            coordinator,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            claim_batch: config.claim_batch,
        }
    }

    /// Run the worker loop indefinitely.
    ///
    /// Messages left `running` by a previous process are returned to
    /// the queue before the first poll.
    pub async fn run(&self) -> Result<()> {
        RefreshQueue::new(&self.pool).requeue_stale().await?;

        info!(
            "refresh worker started (poll interval: {}s)",
            self.poll_interval.as_secs()
        );

        let mut timer = interval(self.poll_interval);
        loop {
            timer.tick().await;
            if let Err(e) = self.process_due().await {
                tracing::error!(error = %e, "refresh poll failed");
            }
        }
    }

    /// Claim and process every currently due message.
    ///
    /// Split out from [`run`] so a single poll can be driven directly.
    pub async fn process_due(&self) -> Result<Vec<RefreshOutcome>> {
        let queue = RefreshQueue::new(&self.pool);
        let messages = queue.claim(self.claim_batch).await?;

        if messages.is_empty() {
            debug!("no refresh messages due");
            return Ok(Vec::new());
        }

        let mut outcomes = Vec::with_capacity(messages.len());
        for message in messages {
            outcomes.push(self.handle_message(&queue, message).await?);
        }
        Ok(outcomes)
    }

    async fn handle_message(
        &self,
        queue: &RefreshQueue<'_>,
        message: RefreshMessage,
    ) -> Result<RefreshOutcome> {
        let user_id = message.user_id();
        let url = message.url().to_string();

        match self.coordinator.refresh(user_id, &url).await {
            Ok(()) => {
                queue.ack(&message.message_id).await?;
                info!(message_id = message.message_id, user_id, url, "refresh succeeded");
                Ok(RefreshOutcome::Succeeded)
            }
            Err(FeedPoolError::NotFound(_)) => {
                // The subscription disappeared; retrying cannot help.
                queue.ack(&message.message_id).await?;
                warn!(message_id = message.message_id, user_id, url, "refresh abandoned, subscription gone");
                Ok(RefreshOutcome::Abandoned)
            }
            Err(FeedPoolError::Fetch(e)) => {
                let failed_attempts = message.failed_attempts + 1;
                queue.ack(&message.message_id).await?;

                if failed_attempts <= MAX_FAILED_ATTEMPTS {
                    let successor = queue
                        .enqueue(user_id, &url, failed_attempts, RETRY_DELAY_SECS)
                        .await?;
                    warn!(
                        message_id = message.message_id,
                        successor,
                        failed_attempts,
                        error = %e,
                        "refresh failed, retry scheduled"
                    );
                    Ok(RefreshOutcome::Retrying)
                } else {
                    warn!(
                        message_id = message.message_id,
                        failed_attempts,
                        error = %e,
                        "refresh abandoned after retries"
                    );
                    Ok(RefreshOutcome::Abandoned)
                }
            }
            Err(e) => {
                // Non-fetch failures are not retried; the message would
                // fail the same way again.
                queue.ack(&message.message_id).await?;
                tracing::error!(message_id = message.message_id, error = %e, "refresh abandoned");
                Ok(RefreshOutcome::Abandoned)
            }
        }
    }
}
