//! Ingestion coordination.
//!
//! Ties subscription rows, the shared item pool, and the fetcher
//! together: subscribing a user, populating a fresh feed exactly once,
//! and refreshing an existing subscription.

use crate::db::DbPool;
use crate::feed::fetcher::FeedFetcher;
use crate::feed::identity::derive_key;
use crate::store::{ItemRepository, SubscribeOutcome, SubscriptionRepository};
use crate::{FeedPoolError, Result};

/// What a refresh does with freshly fetched entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Discard fetched entries; the stored backlog is immutable once
    /// populated and a refresh only touches the subscription.
    #[default]
    FrozenBacklog,
    /// Append entries past the stored count and seed them unread for
    /// every subscriber of the feed.
    AppendNew,
}

/// Outcome of an ingest request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Subscription created; items populated or backlog attached.
    Inserted,
    /// The user already follows this URL; nothing changed.
    AlreadyFollowed,
}

/// Coordinates subscribe-and-populate and refresh flows.
#[derive(Clone)]
pub struct IngestionCoordinator {
    pool: DbPool,
    fetcher: FeedFetcher,
    policy: RefreshPolicy,
}

impl IngestionCoordinator {
    pub fn new(pool: DbPool, fetcher: FeedFetcher, policy: RefreshPolicy) -> Self {
        Self {
            pool,
            fetcher,
            policy,
        }
    }

    /// Subscribe a user to a feed URL and populate the shared pool.
    ///
    /// The subscription row is written before the fetch; a fetch
    /// failure leaves the subscription in place (a later refresh can
    /// fill the items in) and propagates the error to the caller.
    pub async fn ingest(&self, user_id: i64, url: &str) -> Result<IngestOutcome> {
        let feed_key = derive_key(url);
        let subscriptions = SubscriptionRepository::new(&self.pool);
        let items = ItemRepository::new(&self.pool);

        match subscriptions.subscribe(user_id, url, &feed_key).await? {
            SubscribeOutcome::AlreadyExists => return Ok(IngestOutcome::AlreadyFollowed),
            SubscribeOutcome::Created => {}
        }

        let parsed = self.fetcher.fetch(url).await?;

        if !items.has_items(&feed_key).await? {
            items.append_items(&feed_key, &parsed.items).await?;
        } else {
            tracing::debug!(feed_key, "feed already populated, attaching backlog");
        }

        // Seed against what is actually stored, which may differ from
        // this fetch when another subscriber populated the feed first.
        let seqs = items.list_seqs(&feed_key).await?;
        items.seed_read_state(user_id, &feed_key, &seqs).await?;

        Ok(IngestOutcome::Inserted)
    }

    /// Refresh one subscription: touch it and re-fetch the feed.
    ///
    /// Fails with NotFound when the user has no subscription for the
    /// URL. What happens to the fetched entries depends on the
    /// configured [`RefreshPolicy`].
    pub async fn refresh(&self, user_id: i64, url: &str) -> Result<()> {
        let subscriptions = SubscriptionRepository::new(&self.pool);
        let items = ItemRepository::new(&self.pool);

        let subscription = subscriptions
            .find(user_id, url)
            .await?
            .ok_or_else(|| FeedPoolError::NotFound("subscription".to_string()))?;

        subscriptions.touch(user_id, url).await?;

        let parsed = self.fetcher.fetch(url).await?;

        match self.policy {
            RefreshPolicy::FrozenBacklog => {
                tracing::debug!(
                    feed_key = subscription.feed_key,
                    fetched = parsed.items.len(),
                    "refresh complete, backlog frozen"
                );
            }
            RefreshPolicy::AppendNew => {
                let before = items.list_seqs(&subscription.feed_key).await?;
                let inserted = items
                    .append_items(&subscription.feed_key, &parsed.items)
                    .await?;
                if inserted > 0 {
                    let new_seqs: Vec<i64> = ((before.len() as i64 + 1)
                        ..=(before.len() as i64 + inserted as i64))
                        .collect();
                    for subscriber in
                        subscriptions.subscribers_of(&subscription.feed_key).await?
                    {
                        items
                            .seed_read_state(subscriber, &subscription.feed_key, &new_seqs)
                            .await?;
                    }
                    tracing::info!(
                        feed_key = subscription.feed_key,
                        inserted,
                        "refresh appended new items"
                    );
                }
            }
        }

        Ok(())
    }
}
