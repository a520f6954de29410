//! Shared feed item storage and per-user read state.
//!
//! Items live once per feed_key and are shared by every subscriber.
//! Read/unread is a per-user overlay in read_states; a missing overlay
//! row always reads as unread, so the item listing never loses items to
//! a partially seeded overlay.

use sqlx::QueryBuilder;

use crate::db::DbPool;
use crate::feed::types::ItemPayload;
use crate::{FeedPoolError, Result};

/// One stored item joined with the subscription it is reached through.
#[derive(Debug, Clone)]
pub struct ItemRecord {
    /// The subscription URL this item is listed under.
    pub url: String,
    /// 1-based first-seen ordinal within the feed.
    pub item_seq: i64,
    /// The entry payload.
    pub payload: ItemPayload,
}

/// Repository for shared feed items and read-state overlay rows.
pub struct ItemRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ItemRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Whether the shared pool already holds items for this feed.
    pub async fn has_items(&self, feed_key: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM feed_items WHERE feed_key = $1")
                .bind(feed_key)
                .fetch_one(self.pool)
                .await?;
        Ok(count > 0)
    }

    /// All stored item seqs for a feed, ascending.
    pub async fn list_seqs(&self, feed_key: &str) -> Result<Vec<i64>> {
        let seqs: Vec<i64> = sqlx::query_scalar(
            "SELECT item_seq FROM feed_items WHERE feed_key = $1 ORDER BY item_seq",
        )
        .bind(feed_key)
        .fetch_all(self.pool)
        .await?;
        Ok(seqs)
    }

    /// Append fetched entries past the stored count.
    ///
    /// Entries are numbered 1..n in input order. The first `stored`
    /// entries are assumed to already be present (append-only; stored
    /// items are never rewritten), so only entries beyond the current
    /// count are inserted. Runs in one transaction; the
    /// (feed_key, item_seq) primary key plus INSERT OR IGNORE makes a
    /// concurrent double-populate collapse to a single winner.
    ///
    /// Returns the number of rows actually inserted.
    pub async fn append_items(&self, feed_key: &str, items: &[ItemPayload]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let stored: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(item_seq), 0) FROM feed_items WHERE feed_key = $1",
        )
        .bind(feed_key)
        .fetch_one(&mut *tx)
        .await?;

        let mut inserted = 0u64;
        for (offset, item) in items.iter().enumerate().skip(stored as usize) {
            let seq = offset as i64 + 1;
            let payload = serde_json::to_string(item)
                .map_err(|e| FeedPoolError::Database(format!("payload encode: {e}")))?;

            let result = sqlx::query(
                "INSERT OR IGNORE INTO feed_items (feed_key, item_seq, payload)
                 VALUES ($1, $2, $3)",
            )
            .bind(feed_key)
            .bind(seq)
            .bind(payload)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        if inserted > 0 {
            tracing::info!(feed_key, inserted, "feed items appended");
        }
        Ok(inserted)
    }

    /// Seed unread overlay rows for a user over the given item seqs.
    ///
    /// Existing rows are left alone, so re-seeding never flips an item
    /// a user already marked read back to unread.
    pub async fn seed_read_state(
        &self,
        user_id: i64,
        feed_key: &str,
        item_seqs: &[i64],
    ) -> Result<u64> {
        if item_seqs.is_empty() {
            return Ok(0);
        }

        let mut qb = QueryBuilder::new(
            "INSERT OR IGNORE INTO read_states (user_id, feed_key, item_seq, is_read) ",
        );
        qb.push_values(item_seqs, |mut b, seq| {
            b.push_bind(user_id)
                .push_bind(feed_key)
                .push_bind(seq)
                .push_bind(0i64);
        });

        let result = qb.build().execute(self.pool).await?;
        Ok(result.rows_affected())
    }

    /// All items across every subscription of the user.
    ///
    /// Ordered by owning subscription, most recently refreshed first,
    /// then by item seq within each feed.
    pub async fn list_items(&self, user_id: i64) -> Result<Vec<ItemRecord>> {
        let rows: Vec<(String, i64, String)> = sqlx::query_as(
            "SELECT s.url, f.item_seq, f.payload
             FROM subscriptions s
             JOIN feed_items f ON f.feed_key = s.feed_key
             WHERE s.user_id = $1
             ORDER BY datetime(s.last_updated_at) DESC, s.id, f.item_seq",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(row_to_record).collect()
    }

    /// Items of one feed filtered by the user's read state.
    ///
    /// A missing overlay row counts as unread. An empty result is a
    /// valid answer, not an error.
    pub async fn list_items_filtered(
        &self,
        user_id: i64,
        feed_key: &str,
        read: bool,
    ) -> Result<Vec<ItemRecord>> {
        let rows: Vec<(String, i64, String)> = sqlx::query_as(
            "SELECT s.url, f.item_seq, f.payload
             FROM subscriptions s
             JOIN feed_items f ON f.feed_key = s.feed_key
             LEFT JOIN read_states r
               ON r.user_id = s.user_id
              AND r.feed_key = f.feed_key
              AND r.item_seq = f.item_seq
             WHERE s.user_id = $1 AND s.feed_key = $2
               AND COALESCE(r.is_read, 0) = $3
             ORDER BY f.item_seq",
        )
        .bind(user_id)
        .bind(feed_key)
        .bind(read as i64)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(row_to_record).collect()
    }

    /// Mark the given item seqs read for a user.
    ///
    /// Seqs with no stored item are silently skipped. Returns the
    /// number of overlay rows written.
    pub async fn mark_read(
        &self,
        user_id: i64,
        feed_key: &str,
        item_seqs: &[i64],
    ) -> Result<u64> {
        if item_seqs.is_empty() {
            return Ok(0);
        }

        // Upsert against stored items only, so a bogus seq cannot
        // create a phantom overlay row.
        let mut qb = QueryBuilder::new(
            "INSERT INTO read_states (user_id, feed_key, item_seq, is_read)
             SELECT ",
        );
        qb.push_bind(user_id);
        qb.push(", feed_key, item_seq, 1 FROM feed_items WHERE feed_key = ");
        qb.push_bind(feed_key);
        qb.push(" AND item_seq IN (");
        {
            let mut separated = qb.separated(", ");
            for seq in item_seqs {
                separated.push_bind(*seq);
            }
        }
        qb.push(
            ") ON CONFLICT(user_id, feed_key, item_seq)
             DO UPDATE SET is_read = 1, updated_at = datetime('now')",
        );

        let result = qb.build().execute(self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn row_to_record(row: (String, i64, String)) -> Result<ItemRecord> {
    let (url, item_seq, payload) = row;
    let payload: ItemPayload = serde_json::from_str(&payload)
        .map_err(|e| FeedPoolError::Database(format!("payload decode: {e}")))?;
    Ok(ItemRecord {
        url,
        item_seq,
        payload,
    })
}
