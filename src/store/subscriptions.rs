//! Subscription persistence.
//!
//! A subscription is one user-follows-feed relation. The literal URL is
//! kept per subscription; the derived feed_key points at the shared
//! item pool.

use chrono::{DateTime, Utc};

use crate::db::{parse_datetime, DbPool};
use crate::Result;

/// A user's subscription to a feed URL.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    /// The URL exactly as the user submitted it.
    pub url: String,
    /// Loose hash key into the shared item pool.
    pub feed_key: String,
    /// Last time a refresh touched this subscription.
    pub last_updated_at: DateTime<Utc>,
}

/// Outcome of a subscribe attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// A new subscription row was inserted.
    Created,
    /// The user already follows this exact URL; nothing changed.
    AlreadyExists,
}

/// Repository for subscription rows.
pub struct SubscriptionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SubscriptionRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a subscription unless the user already follows this URL.
    ///
    /// The UNIQUE(user_id, url) constraint makes the duplicate check
    /// atomic; two concurrent subscribes to the same URL yield one
    /// `Created` and one `AlreadyExists`.
    pub async fn subscribe(
        &self,
        user_id: i64,
        url: &str,
        feed_key: &str,
    ) -> Result<SubscribeOutcome> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO subscriptions (user_id, url, feed_key) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(url)
        .bind(feed_key)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(SubscribeOutcome::AlreadyExists)
        } else {
            tracing::info!(user_id, url, feed_key, "subscription created");
            Ok(SubscribeOutcome::Created)
        }
    }

    /// All subscriptions for a user, most recently refreshed first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Subscription>> {
        let rows: Vec<(i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, url, feed_key, last_updated_at
             FROM subscriptions WHERE user_id = $1
             ORDER BY datetime(last_updated_at) DESC, id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_subscription).collect())
    }

    /// Find a user's subscription for an exact URL.
    pub async fn find(&self, user_id: i64, url: &str) -> Result<Option<Subscription>> {
        let row: Option<(i64, i64, String, String, String)> = sqlx::query_as(
            "SELECT id, user_id, url, feed_key, last_updated_at
             FROM subscriptions WHERE user_id = $1 AND url = $2",
        )
        .bind(user_id)
        .bind(url)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(row_to_subscription))
    }

    /// User ids of everyone following this feed_key.
    pub async fn subscribers_of(&self, feed_key: &str) -> Result<Vec<i64>> {
        let ids: Vec<i64> = sqlx::query_scalar(
            "SELECT DISTINCT user_id FROM subscriptions WHERE feed_key = $1",
        )
        .bind(feed_key)
        .fetch_all(self.pool)
        .await?;
        Ok(ids)
    }

    /// Record that a refresh touched this subscription now.
    ///
    /// Returns false when the user has no subscription for this URL.
    pub async fn touch(&self, user_id: i64, url: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE subscriptions SET last_updated_at = datetime('now')
             WHERE user_id = $1 AND url = $2",
        )
        .bind(user_id)
        .bind(url)
        .execute(self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_subscription(row: (i64, i64, String, String, String)) -> Subscription {
    let (id, user_id, url, feed_key, last_updated_at) = row;
    Subscription {
        id,
        user_id,
        url,
        feed_key,
        last_updated_at: parse_datetime(&last_updated_at),
    }
}
