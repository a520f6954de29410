//! Database schema and migrations for feedpool.
//!
//! This module contains all database migrations that will be applied
//! sequentially when the database is first opened or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users table
    r#"
-- Users table for authentication. The id is externally supplied at
-- registration time, not auto-assigned.
CREATE TABLE users (
    user_id     INTEGER PRIMARY KEY,
    password    TEXT NOT NULL,           -- Argon2 hash
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: Subscriptions table (user follows feed)
    r#"
-- One row per user-follows-feed relation. The literal url is stored per
-- subscription because the loose feed_key hash is not invertible.
CREATE TABLE subscriptions (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL REFERENCES users(user_id),
    url             TEXT NOT NULL,
    feed_key        TEXT NOT NULL,
    last_updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, url)
);

CREATE INDEX idx_subscriptions_user_id ON subscriptions(user_id);
CREATE INDEX idx_subscriptions_feed_key ON subscriptions(feed_key);
"#,
    // v3: Feed items table (shared, append-only)
    r#"
-- De-duplicated item set per feed_key, shared across all subscribers.
-- item_seq is 1-based first-seen order; the primary key guards the
-- populate-once invariant under concurrent ingestion.
CREATE TABLE feed_items (
    feed_key    TEXT NOT NULL,
    item_seq    INTEGER NOT NULL,
    payload     TEXT NOT NULL,           -- JSON {title, summary, link, published}
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (feed_key, item_seq)
);
"#,
    // v4: Read states table (per-user overlay)
    r#"
-- Per-user read/unread overlay on shared feed_items rows.
CREATE TABLE read_states (
    user_id     INTEGER NOT NULL REFERENCES users(user_id),
    feed_key    TEXT NOT NULL,
    item_seq    INTEGER NOT NULL,
    is_read     INTEGER NOT NULL DEFAULT 0,
    updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (user_id, feed_key, item_seq)
);

CREATE INDEX idx_read_states_user_feed ON read_states(user_id, feed_key);
"#,
    // v5: Refresh queue table (durable work dispatch)
    r#"
-- Durable refresh work queue. body is the JSON message
-- {args: [user_id, url], message_id, failed_attempts}; state is
-- 'queued' or 'running' (terminal outcomes delete the row).
CREATE TABLE refresh_queue (
    message_id   TEXT PRIMARY KEY,
    body         TEXT NOT NULL,
    state        TEXT NOT NULL DEFAULT 'queued',
    available_at TEXT NOT NULL DEFAULT (datetime('now')),
    created_at   TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_refresh_queue_state ON refresh_queue(state, available_at);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_not_empty() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_contains_users_table() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE users"));
        assert!(first.contains("user_id"));
        assert!(first.contains("password"));
    }

    #[test]
    fn test_subscriptions_unique_constraint() {
        assert!(MIGRATIONS[1].contains("UNIQUE(user_id, url)"));
    }

    #[test]
    fn test_feed_items_primary_key() {
        assert!(MIGRATIONS[2].contains("PRIMARY KEY (feed_key, item_seq)"));
    }

    #[test]
    fn test_read_states_primary_key() {
        assert!(MIGRATIONS[3].contains("PRIMARY KEY (user_id, feed_key, item_seq)"));
    }
}
